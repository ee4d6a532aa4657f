//! Command dispatch. A single command today (`extract`), grouped under
//! its own module to leave room for siblings without reshaping `main`.

pub mod extract;
