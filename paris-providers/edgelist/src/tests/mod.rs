pub(crate) use super::{EdgeListError, EdgeListSource};
