use tensile::error::AppResult;

fn main() -> AppResult<()> {
    tensile::run()
}
