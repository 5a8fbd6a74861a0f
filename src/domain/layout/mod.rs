pub mod carousel;
pub mod gallery;
pub mod masonry;
