pub(crate) mod admin;
pub(crate) mod blogs;
pub(crate) mod catalog;
pub(crate) mod meta;
