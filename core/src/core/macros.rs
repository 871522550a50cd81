/// converts a number to a string with thousands separator
#[macro_export]
macro_rules! fmt_num {
    ($num:expr) => {
        $crate::prelude::num_format::ToFormattedString::to_formatted_string(&$num, &$crate::prelude::num_format::Locale::en)
    };
}

#[cfg(debug_assertions)]
pub fn ty_name<T: ?Sized>(name: &'static str) -> &'static str {
    let expected_short_name = std::any::type_name::<T>().split('<').next().and_then(|s| s.split("::").last()).unwrap_or("Unknown");
    debug_assert_eq!(name, expected_short_name);
    name
}
#[cfg(not(debug_assertions))]
pub fn ty_name<T: ?Sized>(name: &'static str) -> &'static str {
    name
}

/// Will ensure that the short name of Self is matching the name of struct, resolved via [Self] argument.
/// Prevents stale names in Debug/Display output after a rename. Panics in debug build only.
#[macro_export]
macro_rules! asserted_short_name {
    ($name:literal, $ty:ty) => {
        $crate::core::macros::ty_name::<$ty>($name)
    };
}
