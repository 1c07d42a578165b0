pub mod mix_bus;
pub mod software_graph;
pub mod source_buffer;
