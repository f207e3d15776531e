//! Activity counters.

/// Declares a struct of `u64` counters with `incr_<name>` and `add_<name>` helpers.
///
/// ### Example
/// ```
/// shellflow::counters! {
///     /// Counters of a pass-through process.
///     pub struct PipeStats {
///         /// Chunks moved.
///         chunks,
///     }
/// }
///
/// let mut stats = PipeStats::default();
/// stats.incr_chunks();
/// stats.add_chunks(2);
/// assert_eq!(stats.chunks, 3);
/// ```
#[macro_export]
macro_rules! counters {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, PartialEq, Eq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: u64,
            )*
        }

        impl $name {
            $(
                $crate::paste::paste! {
                    #[doc = concat!("Increments `", stringify!($field), "` by one.")]
                    pub fn [<incr_ $field>](&mut self) { self.$field = self.$field.wrapping_add(1); }

                    #[doc = concat!("Increments `", stringify!($field), "` by `n`.")]
                    pub fn [<add_ $field>](&mut self, n: u64) { self.$field = self.$field.wrapping_add(n); }
                }
            )*
        }
    };
}
