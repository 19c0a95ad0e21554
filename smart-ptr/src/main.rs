use io_impl::RealIo;
use smart_ptr_lib::app::run;

fn main() -> std::io::Result<()> {
    env_logger::init();
    run(&RealIo())
}
