use hex_literal::hex;
use tcrypto_common::{
    bignum_new, bignum_secure_free, consttime_memequal, prime_new, read_random, secure_memset,
    BigNum, Errno, PrimeGen, Sign, Soft, Status, Word
};

#[test]
fn zero_size_is_bad_arg() {
    let mut handle: Option<BigNum> = None;
    assert_eq!(bignum_new(None, 0, Some(&mut handle)), Status::BAD_ARG);
    assert!(handle.is_none());
}

#[test]
fn partial_word_size_is_bad_arg() {
    let mut handle: Option<BigNum> = None;
    assert_eq!(bignum_new(None, 3, Some(&mut handle)), Status::BAD_ARG);
    assert!(handle.is_none());
}

#[test]
fn single_word_preload() {
    let word = Word::from_le_bytes(hex!("01020304"));
    let mut handle: Option<BigNum> = None;

    assert_eq!(bignum_new(Some(&[word]), 4, Some(&mut handle)), Status::NO_ERR);

    let bn = handle.take().unwrap();
    let mut out = [0 as Word; 1];
    assert_eq!(bn.words_into(&mut out), Ok((Sign::Positive, 1)));
    assert_eq!(out, [0x0403_0201]);

    bignum_secure_free(Some(bn), 4);
}

#[test]
fn constant_time_equality() {
    assert_eq!(consttime_memequal(b"abcd", b"abcd", 4), 1);
    assert_eq!(consttime_memequal(b"abcd", b"abce", 4), 0);
    assert_eq!(consttime_memequal(b"", b"", 0), 1);
}

#[test]
fn memset_overflow_clamps() {
    let mut buf = [0u8; 16];
    assert_eq!(secure_memset(&mut buf, 0xAA, 20), Err(Errno::EOVERFLOW));
    assert_eq!(buf, hex!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"));
}

#[test]
fn read_random_is_fresh() {
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];

    assert_eq!(read_random(&mut a), Ok(()));
    assert_eq!(read_random(&mut b), Ok(()));
    assert_ne!(a, b);
    assert_ne!(a, [0u8; 32]);
}

#[test]
fn multi_word_values_keep_word_order() {
    // 0x0c0b0a09_08070605_04030201, least significant word first.
    let bytes = hex!("01020304 05060708 090a0b0c");
    let words: Vec<Word> = bytes
        .chunks_exact(4)
        .map(|chunk| Word::from_le_bytes(chunk.try_into().unwrap()))
        .collect();

    let bn = BigNum::<Soft>::new(Some(&words), 12).unwrap();
    let mut out = [0 as Word; 3];
    assert_eq!(bn.words_into(&mut out), Ok((Sign::Positive, 3)));
    assert_eq!(out, [0x0403_0201, 0x0807_0605, 0x0c0b_0a09]);
}

#[test]
fn prime_generator_lifecycle() {
    let mut handle: Option<PrimeGen> = None;
    assert_eq!(prime_new(3072, Some(&mut handle)), Status::NO_ERR);
    assert_eq!(handle.as_ref().unwrap().max_bits(), Ok(3072));
    drop(handle);

    let mut handle: Option<PrimeGen> = None;
    assert_eq!(prime_new(-3072, Some(&mut handle)), Status::BAD_ARG);
    assert!(handle.is_none());
}

#[test]
fn handles_move_across_threads() {
    let mut bn = BigNum::<Soft>::with_words(&[1, 2, 3, 4]).unwrap();

    let bn = std::thread::spawn(move || {
        bn.randomize(128).unwrap();
        bn
    }).join().unwrap();

    assert_eq!(bn.word_len(), 4);
    bn.secure_free(16);
}
