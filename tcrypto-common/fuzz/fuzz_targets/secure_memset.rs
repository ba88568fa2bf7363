#![no_main]

use libfuzzer_sys::fuzz_target;
use tcrypto_common::{secure_memset, Errno};

fuzz_target!(|input: (u8, u16, u16)| {
    let (c, smax, n) = input;
    let (smax, n) = (usize::from(smax % 4096), usize::from(n % 8192));

    let guard = c.wrapping_add(1);
    let mut buf = vec![guard; smax + 16];

    let res = secure_memset(&mut buf[..smax], c, n);
    let written = n.min(smax);

    if n > smax {
        assert_eq!(res, Err(Errno::EOVERFLOW));
    } else {
        assert_eq!(res, Ok(()));
    }

    assert!(buf[..written].iter().all(|b| *b == c));
    assert!(buf[written..].iter().all(|b| *b == guard));
});
