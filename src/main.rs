use std::env;
use std::process;

use log::debug;
use weight_dial::{DialConfig, DialError, Theme, WeightDial};

fn main() -> Result<(), DialError> {
    env_logger::init();

    // Parse --title, --theme and --weight from the command line
    let mut title = "Weight".to_string();
    let mut theme = Theme::light_blue();
    let mut initial_weight = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--title" => {
                if let Some(value) = args.next() {
                    title = value;
                }
            }
            "--theme" => match args.next().as_deref() {
                Some("light") => theme = Theme::light_blue(),
                Some("dark") => theme = Theme::dark_amber(),
                other => {
                    eprintln!("unknown theme {other:?}, expected \"light\" or \"dark\"");
                    process::exit(2);
                }
            },
            "--weight" => {
                initial_weight = args.next().and_then(|value| value.parse::<f32>().ok());
            }
            other => {
                eprintln!("unknown argument {other}");
                eprintln!("usage: weight-dial [--title TITLE] [--theme light|dark] [--weight W]");
                process::exit(2);
            }
        }
    }

    let config = DialConfig::builder()
        .title(title)
        .theme(theme)
        .maybe_initial_weight(initial_weight)
        .build();

    WeightDial::new(config).show_with_listener(|weight| debug!("selected weight {weight}"))
}
