//! Macros for declaring state keys.

/// Declare a module of state key constants plus an `ALL` list.
///
/// Keys are plain `&str`, so they work anywhere a key is expected while
/// keeping typos out of call sites.
///
/// # Example
///
/// ```
/// use statecraft::state_keys;
///
/// state_keys! {
///     pub mod guard_keys {
///         PATROL = "Patrol",
///         ALERT = "Alert",
///         COMBAT = "Combat",
///     }
/// }
///
/// assert_eq!(guard_keys::ALERT, "Alert");
/// assert_eq!(guard_keys::ALL, &["Patrol", "Alert", "Combat"]);
/// ```
#[macro_export]
macro_rules! state_keys {
    (
        $(#[$meta:meta])*
        $vis:vis mod $name:ident {
            $(
                $(#[$key_meta:meta])*
                $key:ident = $value:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis mod $name {
            $(
                $(#[$key_meta])*
                pub const $key: &str = $value;
            )*

            /// Every key declared in this module, in declaration order.
            pub const ALL: &[&str] = &[$($key),*];
        }
    };
}
