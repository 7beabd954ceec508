//! Macros for reducing boilerplate when defining entities
//!
//! These macros generate the repetitive trait implementations needed for
//! keyword enums (statuses, priorities) and stored records.

/// Define a keyword enum parsed from and rendered as lowercase snake_case text
///
/// Generates `as_str`, `ALL`, `Default`, `Display`, `FromStr` (with an error
/// listing the accepted values) and `Serialize`.
///
/// # Example
///
/// ```rust,ignore
/// keyword_enum! {
///     /// Workflow state of a task
///     TaskStatus {
///         Pending => "pending",
///         InProgress => "in_progress",
///     }
///     default Pending
/// }
///
/// assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
/// ```
#[macro_export]
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => $text:literal ),+ $(,)?
        }
        default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(format!(
                        "must be one of: {} (got '{}')",
                        [ $( $text ),+ ].join(", "),
                        s
                    )),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

/// Implement [`Record`](crate::core::service::Record) for a struct with an `id: i64` field
///
/// An optional `unique` list names `String` fields that must be unique
/// across all records of the type.
#[macro_export]
macro_rules! impl_record {
    ($type:ident, $entity:literal $(, unique [ $( $field:ident ),+ $(,)? ] )? ) => {
        impl $crate::core::service::Record for $type {
            const ENTITY: &'static str = $entity;

            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }

            $(
                fn unique_keys(&self) -> Vec<(&'static str, String)> {
                    vec![ $( (stringify!($field), self.$field.clone()) ),+ ]
                }
            )?
        }
    };
}
