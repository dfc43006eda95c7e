mod crockford;

pub(crate) use crockford::*;
