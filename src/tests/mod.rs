pub mod support;

mod app;
mod morphology;
