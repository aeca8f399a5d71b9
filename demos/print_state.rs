//! Example: print the LiveDisplay state of this device.
//!
//! Run with: `cargo run --example print_state`

use livedisplay_client::{Feature, LiveDisplayProxy};

fn main() {
    // Initialize logging (optional)
    env_logger::init();

    let proxy = LiveDisplayProxy::system();

    if proxy.has_feature(Feature::DisplayModes) {
        match proxy.display_modes() {
            Ok(modes) => {
                for mode in modes {
                    println!("mode: {} (id {})", mode.name, mode.id);
                }
            }
            Err(e) => eprintln!("Error listing modes: {}", e),
        }
        match proxy.current_mode() {
            Ok(Some(mode)) => println!("current mode: {}", mode.name),
            Ok(None) => println!("no mode set"),
            Err(e) => eprintln!("Error reading current mode: {}", e),
        }
    } else {
        println!("display modes not supported");
    }

    if proxy.has_feature(Feature::ColorBalance) {
        println!("color balance: {}", proxy.color_balance());
        if let Ok(range) = proxy.color_balance_range() {
            println!("color balance range: {}..={}", range.min, range.max);
        }
    }

    if proxy.has_feature(Feature::PictureAdjustment) {
        match proxy.picture_adjustment() {
            Ok(hsic) => println!("picture adjustment: {:?}", hsic),
            Err(e) => eprintln!("Error reading picture adjustment: {}", e),
        }
    }

    println!(
        "adaptive backlight: {}, outdoor mode: {}",
        proxy.adaptive_backlight_enabled(),
        proxy.outdoor_mode_enabled()
    );
}
