//! Macro for declaring port error enums.
//!
//! Each variant carries named fields and a display template. The macro
//! derives the error traits, adds one snake_case constructor per variant
//! taking `impl Into<_>` for every field, and a `kind()` label for logs.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                #[allow(missing_docs, reason = "fields are described by the variant")]
                $variant { $($field : $ty),+ },
            )+
        }

        ::paste::paste! {
            #[allow(missing_docs, reason = "constructors mirror the documented variants")]
            impl $name {
                $(
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                )+

                /// Stable snake_case label of the variant.
                pub const fn kind(&self) -> &'static str {
                    match self {
                        $(Self::$variant { .. } => stringify!([<$variant:snake>]),)+
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;
