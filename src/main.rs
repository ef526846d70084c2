use std::io::Result;

fn main() -> Result<()> {
    env_logger::init();
    ocean_ball_sim::app::run()
}
