pub mod acquirer;
pub mod assembler;
pub mod clock;
pub mod composer;
pub mod controller;
pub mod encoder_driver;
pub mod mixer;
pub mod probe;
