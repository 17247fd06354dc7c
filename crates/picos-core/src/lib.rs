pub mod error;
pub mod consts;
pub mod frame;
pub mod config;
pub mod correct;
pub mod accum;
pub mod source;
pub mod io;
pub mod engine;
pub mod preview;
pub mod instrument;
pub mod sequence;
