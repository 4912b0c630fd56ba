/// Defines a newtype row identifier around an `i64` and generates:
/// - derives (Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)
/// - `Display`
/// - `From<i64> for $name` and `From<$name> for i64`
///
/// Usage:
///   define_id_type!(
///       /// Telescope row identifier.
///       TelescopeId
///   );
#[macro_export]
macro_rules! define_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl ::std::convert::From<i64> for $name {
            fn from(v: i64) -> Self {
                $name(v)
            }
        }

        impl ::std::convert::From<$name> for i64 {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl $name {
            pub fn new(value: i64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }
    };
}

/// Binds a record type to its identifier so it can be wrapped in
/// [`Stored`](crate::models::Stored).
///
/// Usage:
///   impl_entity!(Telescope, TelescopeId, "telescope");
#[macro_export]
macro_rules! impl_entity {
    ($record:ty, $id:ty, $name:literal) => {
        impl $crate::models::Entity for $record {
            type Id = $id;
            const NAME: &'static str = $name;
        }
    };
}
