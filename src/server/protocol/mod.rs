/// Wire protocol: frame codec and the integer message layouts carried in it.

pub mod codec;
pub mod messages;
