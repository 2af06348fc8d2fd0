//! Port error declarations.
//!
//! `define_port_error!` expands an enum body into a `thiserror` error with
//! one `impl Into<_>` constructor per variant and a `kind()` accessor
//! giving the variant's snake_case name for log fields.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (@pattern $variant:ident) => { Self::$variant };
    (@pattern $variant:ident { $($field:ident : $ty:ty),* }) => { Self::$variant { .. } };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Snake-case variant name.
            #[must_use]
            pub fn kind(&self) -> &'static str {
                ::paste::paste! {
                    match self {
                        $(
                            define_port_error!(@pattern $variant $( { $($field : $ty),* } )?) =>
                                stringify!([<$variant:snake>]),
                        )*
                    }
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    define_port_error! {
        pub enum SamplePortError {
            Unreachable { message: String } => "unreachable: {message}",
            Rejected { status: u16 } => "rejected with {status}",
            ForeignRow { id: Uuid, message: String } => "foreign {id}: {message}",
            Closed => "closed",
        }
    }

    #[rstest]
    fn constructors_convert_their_arguments() {
        assert_eq!(
            SamplePortError::unreachable("dns"),
            SamplePortError::Unreachable {
                message: "dns".to_owned()
            }
        );
        assert_eq!(
            SamplePortError::rejected(503_u16),
            SamplePortError::Rejected { status: 503 }
        );
        let id = Uuid::nil();
        assert_eq!(
            SamplePortError::foreign_row(id, "owned elsewhere").to_string(),
            format!("foreign {id}: owned elsewhere")
        );
        assert_eq!(SamplePortError::closed().to_string(), "closed");
    }

    #[rstest]
    #[case(SamplePortError::unreachable("x"), "unreachable")]
    #[case(SamplePortError::rejected(400_u16), "rejected")]
    #[case(SamplePortError::foreign_row(Uuid::nil(), "x"), "foreign_row")]
    #[case(SamplePortError::closed(), "closed")]
    fn kind_names_the_variant(#[case] err: SamplePortError, #[case] expected: &str) {
        assert_eq!(err.kind(), expected);
    }
}
