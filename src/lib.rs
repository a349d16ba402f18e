pub mod clippings;
pub mod output;
pub mod utility;
