//! Macro utilitaria para declarar outcomes cerrados de un step.
//!
//! Exportada en la raíz del crate:
//!   use flow_core::outcome_enum;

/// Declara un enum de outcomes con su clave string asociada.
///
/// ```ignore
/// outcome_enum! {
///     pub enum Validation {
///         Success => "success",
///         Fail => "fail",
///     }
/// }
/// ```
///
/// Genera `as_str`, `ALL`, `Display`, `FromStr` (con `UnknownOutcome`) y
/// `From<Enum> for OutcomeKey`, de modo que el enum se puede usar tanto como
/// retorno de `TypedStep::run_typed` como al cablear transiciones.
#[macro_export]
macro_rules! outcome_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $key:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name { $($(#[$vmeta])* $variant),+ }

        impl $name {
            /// Todas las variantes en orden de declaración.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(&self) -> &'static str {
                match self { $($name::$variant => $key),+ }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::step::UnknownOutcome;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                match s {
                    $($key => Ok($name::$variant),)+
                    other => Err($crate::step::UnknownOutcome(other.to_string())),
                }
            }
        }

        impl ::core::convert::From<$name> for $crate::step::OutcomeKey {
            fn from(outcome: $name) -> Self {
                $crate::step::OutcomeKey::from_static(outcome.as_str())
            }
        }
    };
}
