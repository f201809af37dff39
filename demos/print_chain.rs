use powchain::{Chain, PowConfigBuilder, ProofOfWork, DEFAULT_DIFFICULTY};
use std::env;

fn main() -> Result<(), String> {
    env_logger::init();

    let difficulty: u32 = env::var("POW_DIFFICULTY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DIFFICULTY);

    let config = PowConfigBuilder::default()
        .difficulty(difficulty)
        .build_validated()
        .map_err(|e| e.to_string())?;

    let mut chain = Chain::with_config(config).map_err(|e| e.to_string())?;
    for data in [
        "First Block after Genesis Block",
        "Second Block after Genesis Block",
        "Third Block after Genesis Block",
    ] {
        chain.append(data).map_err(|e| e.to_string())?;
    }

    for block in &chain {
        let pow = ProofOfWork::new(block, chain.config()).map_err(|e| e.to_string())?;
        println!("{block}");
        println!("PoW: {}", pow.validate());
        println!();
    }

    Ok(())
}
