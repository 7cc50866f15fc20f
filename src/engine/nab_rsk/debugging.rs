// Panics in debug builds, logs and continues in release
#[macro_export]
macro_rules! debug_panic
{
    ($($arg:tt)*) =>
    {
        if cfg!(debug_assertions)
        {
            panic!($($arg)*)
        }
        else
        {
            log::error!($($arg)*)
        }
    }
}
