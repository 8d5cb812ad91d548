//! Status LED task

use defmt::*;
use embassy_rp::gpio::Output;

use crate::channels::LED_TOGGLE;

/// Toggle the LED whenever the heartbeat event is raised
#[embassy_executor::task]
pub async fn led_task(mut led: Output<'static>) {
    info!("LED task started");

    loop {
        LED_TOGGLE.wait().await;
        led.toggle();
    }
}
