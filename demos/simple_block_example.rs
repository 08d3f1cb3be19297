// Walks through the classic worked DES example: the round keys derived from
// 133457799BBCDFF1, then one block encrypted and decrypted with them.

use des_modes::des;

const WORKED_KEY: u64 = 0x133457799BBCDFF1;
const WORKED_BLOCK: u64 = 0x0123456789ABCDEF;
const WORKED_CIPHERTEXT: u64 = 0x85E813540F0AB405;

fn main() {
    let keys = des::generate_round_keys(WORKED_KEY);
    println!("key {:016X}", WORKED_KEY);
    for (round, subkey) in keys.iter().enumerate() {
        println!("  K{:<2} = {:012X}", round + 1, subkey);
    }

    let ciphertext = des::process_block(WORKED_BLOCK, &keys, des::Action::Encrypt);
    let recovered = des::process_block(ciphertext, &keys, des::Action::Decrypt);

    println!("block      {:016X}", WORKED_BLOCK);
    println!("ciphertext {:016X} (published: {:016X})", ciphertext, WORKED_CIPHERTEXT);
    println!("recovered  {:016X}", recovered);
    if ciphertext != WORKED_CIPHERTEXT || recovered != WORKED_BLOCK {
        eprintln!("mismatch against the published vector");
        std::process::exit(1);
    }
}
