use des_modes;


fn main() {
    let sample_inp = "Now is the time for all ";
    let sample_key = "0123456789ABCDEF";
    let sample_iv = "1234567890ABCDEF";
    println!("Sample input: {:?}", sample_inp);

    let (ciphertext, iv) = des_modes::encrypt(sample_inp, sample_key, "cfb", Some(sample_iv))
        .expect("valid key and IV");
    println!("CFB cipher: {}", ciphertext);
    println!("IV: {:?}", iv);

    let plaintext = des_modes::decrypt(&ciphertext, sample_key, "cfb", iv.as_deref())
        .expect("ciphertext produced above");
    println!("Plaintext: {:?}", plaintext);
}
