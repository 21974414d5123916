use std::io;

use minnow::repl;

fn main() -> io::Result<()> {
    repl::run()
}
