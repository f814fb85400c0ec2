mod common;
mod extraction;
mod routing;
