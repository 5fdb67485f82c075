fn main() {
    std::fs::read_dir("../libraries")
        .unwrap()
        .for_each(|lib| {
            println!(
                "cargo:rerun-if-changed=../libraries/{}",
                lib.unwrap().file_name().to_str().unwrap()
            )
        });
}
