//! Constantes del motor core.

/// Versión lógica del motor. Forma parte del input del `definition_hash` de
/// una `TransitionTable`, de modo que un cambio incompatible del motor
/// invalida los hashes previos aunque el cableado no cambie.
pub const ENGINE_VERSION: &str = "SF1.0";
