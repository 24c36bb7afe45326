//! Business entities served by the remote query engine

pub mod cliente;
pub mod tipo_cliente;
pub mod usuario;

pub use cliente::Cliente;
pub use tipo_cliente::TipoCliente;
pub use usuario::Usuario;
