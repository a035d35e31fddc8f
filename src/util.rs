#![allow(unused_macros)]

macro_rules! unwrap_or_return {
    ($option:expr, $ret:expr) => {
        match $option {
            Some(x) => x,
            None => return $ret,
        }
    };
    ($option:expr) => {
        unwrap_or_return!($option, ())
    };
}

macro_rules! chk {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return ::std::result::Result::Err($err);
        }
    };
}
