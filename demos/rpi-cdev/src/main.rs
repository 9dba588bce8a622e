use std::thread::sleep;
use std::time::Duration;

use embedded_hal::digital::PinState;
use gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::CdevPin;
use log::{error, info};
use sevenseg::{Digit, LineProvider, SevenSegment, Wiring};

const CHIP_PATH: &str = "/dev/gpiochip0";
const CONSUMER: &str = "7seg";

struct GpioChip(Chip);

impl LineProvider for GpioChip {
    type Id = u32;
    type Line = CdevPin;
    type Error = gpio_cdev::Error;

    fn acquire(&mut self, id: u32, initial: PinState) -> Result<CdevPin, gpio_cdev::Error> {
        let line = self.0.get_line(id)?;
        let value = u8::from(initial == PinState::High);
        let handle = line.request(LineRequestFlags::OUTPUT, value, CONSUMER)?;
        CdevPin::new(handle)
    }

    // Dropping the handle closes its file descriptor, which frees the line.
    fn release(&mut self, line: CdevPin) {
        drop(line);
    }
}

fn main() {
    env_logger::init();

    let chip = match Chip::new(CHIP_PATH) {
        Ok(chip) => GpioChip(chip),
        Err(e) => {
            error!("cannot open {}: {}", CHIP_PATH, e);
            std::process::exit(1);
        }
    };

    let mut display = match SevenSegment::initialize(chip, Wiring::raspberry_pi()) {
        Ok(display) => display,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Counting up...");
    for digit in Digit::ALL {
        if let Err(e) = display.show(digit) {
            error!("cannot show {}: {}", digit.value(), e);
            break;
        }
        info!("showing {}", display.current().to_ascii() as char);
        sleep(Duration::from_millis(500));
    }

    display.shutdown();
    info!("lines released");
}
