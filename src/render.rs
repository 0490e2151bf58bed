pub(crate) mod cpu;
pub(crate) mod frame;
pub(crate) mod particles;
pub(crate) mod surface;
