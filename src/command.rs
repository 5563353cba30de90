//! Command implementations.
//!
//! Each command wires configuration, CI detection and the concrete
//! collaborators together before handing off to the orchestrator.
