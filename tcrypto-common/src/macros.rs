macro_rules! std {
    ($($item:item)*) => {
        $(
            #[cfg(feature = "std")]
            $item
        )*
    };
}

macro_rules! can_panic {
    ($($item:item)*) => {
        $(
            #[cfg(feature = "can-panic")]
            $item
        )*
    };
}
