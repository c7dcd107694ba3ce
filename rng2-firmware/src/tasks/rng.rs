//! RNG2 polling task
//!
//! Brings the device up once, then reads a block of random bytes every poll
//! interval, putting the device to sleep in between. The driver blocks while
//! it bit-bangs; a transaction takes a few milliseconds and nothing else
//! shares the executor.

use defmt::*;
use embassy_time::{Delay, Duration, Timer};
use rng2_drivers::{Error, Rng2};
use rng2_hal::EmbassyClock;
use rng2_hal_rp2040::FlexLine;
use rng2_protocol::command::RANDOM_SIZE;

/// The driver as wired on this board
pub type Rng2Device = Rng2<FlexLine<'static>, FlexLine<'static>, Delay, EmbassyClock>;

/// RNG2 task
///
/// Halts (idles forever) if the device cannot be identified at start-up.
/// Runtime failures are logged and followed by a bus sync; the cycle is
/// skipped and the next one tries again.
#[embassy_executor::task]
pub async fn rng_task(mut rng: Rng2Device, poll_interval: Duration) {
    info!("RNG2 task starting at address {=u8:#x}", rng.config().address);

    if let Err(e) = rng.i2c_sync() {
        // A sleeping device may not take part in the sync yet
        warn!("RNG2 bus sync failed: {:?}", e);
    }
    rng.send_wake();

    match rng.read_info() {
        Ok(info) => {
            info!(
                "RNG2 found: device id {=u8:#x}, silicon id {=u8:#x}, revision {:02x}",
                info.device_id(),
                info.silicon_id(),
                info.revision
            );
        }
        Err(e) => {
            error!("RNG2 not responding as expected: {:?}", e);
            core::future::pending::<()>().await;
        }
    }

    if let Err(e) = rng.low_power_mode() {
        warn!("RNG2 sleep failed: {:?}", e);
    }

    loop {
        Timer::after(poll_interval).await;

        match poll(&mut rng) {
            Ok(bytes) => info!("random: {:02x}", bytes),
            Err(e) => {
                warn!("RNG2 read failed: {:?}", e);
                if e.is_transport() {
                    if let Err(e) = rng.i2c_sync() {
                        warn!("RNG2 bus sync failed: {:?}", e);
                    }
                }
            }
        }
    }
}

/// One wake / read / sleep cycle
fn poll(rng: &mut Rng2Device) -> Result<[u8; RANDOM_SIZE], Error> {
    rng.send_wake();
    let bytes = rng.read_random_num()?;
    rng.low_power_mode()?;
    Ok(bytes)
}
