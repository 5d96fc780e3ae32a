use mazetree::{app::App, generators::Algorithm};

fn main() -> Result<(), mazetree::app::AppError> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);
    let side = args.next().and_then(|s| s.parse::<u16>().ok()).unwrap_or(1000);

    for algorithm in [Algorithm::Dfs, Algorithm::Prim] {
        let (generating, solving) = App::profile(side, side, algorithm, num_iters)?;
        println!(
            "{} on {}x{} ({} runs): generate {:?}, path {:?}",
            algorithm, side, side, num_iters, generating, solving
        );
    }
    Ok(())
}
