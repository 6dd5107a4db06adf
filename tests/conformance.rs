//! Golden-value tests against digests produced by the `fsverity` reference
//! tooling (and, for `hello world`, cross-checked with composefs).

use sha2::Digest;
use veritree::{Algorithm, VerityParams, VeritySha256, VeritySha512};

/// Wrapping byte counter, the pattern all sized fixtures use.
fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

fn sha256_digest(data: &[u8]) -> String {
    let mut hasher = VeritySha256::new();
    Digest::update(&mut hasher, data);
    hex::encode(hasher.finalize())
}

fn sha512_digest(data: &[u8]) -> String {
    let mut hasher = VeritySha512::new();
    Digest::update(&mut hasher, data);
    hex::encode(hasher.finalize())
}

#[test]
fn empty_input() {
    // an empty file still has a measurement: the descriptor is hashed with
    // an all-zero root and data_size 0
    assert_eq!(
        sha256_digest(b""),
        "3d248ca542a24fc62d1c43b916eae5016878e2533c88238480b26128a1f1af95"
    );
    assert_eq!(
        sha512_digest(b""),
        "ccf9e5aea1c2a64efa2f2354a6024b90dffde6bbc017825045dce374474e13d1\
         0adb9dadcc6ca8e17a3c075fbd31336e8f266ae6fa93a6c3bed66f9e784e5abf"
    );
}

#[test]
fn single_zero_byte() {
    assert_eq!(
        sha256_digest(b"\x00"),
        "b803429503d95915829b29fdbc8bbad142f3abfd11b1cadf5526582e685c0551"
    );
}

#[test]
fn hello_world_both_algorithms() {
    assert_eq!(
        sha256_digest(b"hello world"),
        "1e2eaa4202d750a41174ee454970b92c1bc2f925b1e35076d8c7d5f56362ba64"
    );
    assert_eq!(
        sha512_digest(b"hello world"),
        "18430270729d162d4e469daca123ae61893db4b0583d8f7081e3bf4f92b88ba5\
         14e7982f10733fb6aa895195c5ae8fd2eb2c47a8be05513ce5a0c51a6f570409"
    );
}

#[test]
fn block_boundaries() {
    assert_eq!(
        sha256_digest(&pattern(4096)),
        "15a0095100272ab90a2209e97f8a2c54dff6f84d2b29524f95d92fe23b6ef25b"
    );
    assert_eq!(
        sha256_digest(&pattern(4097)),
        "eaf219cbd8f40c7424e41b1034906a8d70b7a9ae42f0eca54393b965866f5932"
    );
    assert_eq!(
        sha256_digest(&pattern(8192)),
        "af4ea4341bd2baacf132662d6bc3a30b67e473b514a52efcf6e56947db061297"
    );
}

#[test]
fn level_one_boundary() {
    // 128 leaf digests fill exactly one parent block at these parameters
    assert_eq!(
        sha256_digest(&pattern(4096 * 128)),
        "9dd419a91daffdea8eaec180f2725d772a597de0dfac88e5a813b06fac84271d"
    );
    assert_eq!(
        sha256_digest(&pattern(4096 * 128 + 1)),
        "b632fcd62d0c59f261efb791362876c5bf672bedbbcfc24800d7bb9dd01108af"
    );
    assert_eq!(
        sha512_digest(&pattern(4096 * 128 + 1)),
        "9e64df899f43b7d7931c45c4d0b6cad26a963fc49c91287e4fd829c34053a50f\
         0ac65dbc23474651c85d8ffaca552383dcc0f79f702824226aaec798a704af88"
    );
    assert_eq!(
        sha512_digest(&pattern(4097)),
        "f3cac40d4a13003faaa98ce858b8391e34062f5a544d7855f2bb5049fbe0e345\
         e35fb9ac450484de07611f202d610e117598ca738b83f4cc363d31fec5178095"
    );
}

#[test]
fn chunking_does_not_change_the_digest() {
    let data = pattern(4096 * 128 + 1);
    let expected = "b632fcd62d0c59f261efb791362876c5bf672bedbbcfc24800d7bb9dd01108af";

    for split in [1usize << 9, 4096, 4097, 65536] {
        let mut hasher = VeritySha256::new();
        for chunk in data.chunks(split) {
            Digest::update(&mut hasher, chunk);
        }
        assert_eq!(hex::encode(hasher.finalize()), expected, "split {split}");
    }
}

#[test]
fn salted_digests() {
    let mut hasher = VeritySha256::with_salt(&[1, 2, 3, 4]).unwrap();
    Digest::update(&mut hasher, b"hello world");
    assert_eq!(
        hex::encode(hasher.finalize()),
        "1ac2713f0923b144e7ea01258e871fa356a66d235b6155fb7625f9aad4d8b0a5"
    );

    // maximum length salt
    let salt: Vec<u8> = (0..32).collect();
    let mut hasher = VeritySha256::with_salt(&salt).unwrap();
    Digest::update(&mut hasher, pattern(5000));
    assert_eq!(
        hex::encode(hasher.finalize()),
        "5093778bf2ab239a5845866971e57bb33d87ede9e2f47efcfc31a0fd04371868"
    );
}

#[test]
fn non_default_block_size() {
    let mut hasher = VeritySha256::with_params(&[], 1024).unwrap();
    Digest::update(&mut hasher, pattern(3000));
    assert_eq!(
        hex::encode(hasher.finalize()),
        "067063ada66c46161c234a95d89f0291c32d719e15243025b343fa3c4bdd3266"
    );

    // deep enough to need three levels at 1024-byte blocks
    let mut hasher = VeritySha256::with_params(&[], 1024).unwrap();
    Digest::update(&mut hasher, pattern(300_000));
    assert_eq!(
        hex::encode(hasher.finalize()),
        "730b414e4e4d6e258b0ab2b454ba5610a496eff05f7f6a32bf6945e1118d7aec"
    );
}

#[test]
fn runtime_dispatch_matches_static_hashers() {
    let params = VerityParams {
        algorithm: Algorithm::Sha256,
        ..Default::default()
    };
    let mut hasher = params.build().unwrap();
    use sha2::digest::DynDigest;
    use std::io::Write;
    hasher.write_all(b"hello world").unwrap();
    assert_eq!(
        hex::encode(hasher.finalize()),
        "1e2eaa4202d750a41174ee454970b92c1bc2f925b1e35076d8c7d5f56362ba64"
    );
}
