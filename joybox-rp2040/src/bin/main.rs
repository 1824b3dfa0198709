#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{AnyPin, Level, Output};
#[cfg(feature = "board-pico")]
use embassy_rp::i2c::Config as I2cConfig;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, USB};
use embassy_rp::usb::Driver;
use embassy_time::Delay;
use embassy_usb::class::{cdc_acm, hid};
use embassy_usb::{Builder, Config as UsbConfig, UsbDevice};
use joybox_core::{
    aggregate, detect_host, mux_level, plan_boot, wants_bootloader, CommunicationBackend,
    GpioButtonInput, JoybusOutput, NunchukInput, Runtime,
};
use joybox_rp2040::board::{self, AdcPins, BOARD};
use joybox_rp2040::{
    configure_dinput, configure_keyboard, configure_viewer, usb_configured, CycleClock,
    DInputOutput, KeyboardOutput, RpJoybusPort, RpPinBank, UsbDriver, UsbStateHandler,
    ViewerOutput,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// USB device configuration buffers.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// USB class state.
static DINPUT_STATE: StaticCell<hid::State> = StaticCell::new();
static KEYBOARD_STATE: StaticCell<hid::State> = StaticCell::new();
static VIEWER_STATE: StaticCell<cdc_acm::State> = StaticCell::new();
static USB_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();

type NunchukBus = I2c<'static, I2C0, i2c::Blocking>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("joybox starting on board `{}`", BOARD.name);

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    if let Err(e) = BOARD.validate() {
        defmt::panic!("Invalid board table: {}", e);
    }

    // --- Buttons and boot holds ---
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let channels = board::adc_channels(AdcPins {
        pin_26: p.PIN_26,
        pin_27: p.PIN_27,
        pin_28: p.PIN_28,
        pin_29: p.PIN_29,
    });
    let mut buttons = GpioButtonInput::new(
        RpPinBank::new(BOARD.buttons, adc, channels),
        BOARD.buttons,
    );
    let holds = aggregate(&mut buttons);

    if wants_bootloader(&holds, &BOARD.boot) {
        info!("Start held, rebooting into the USB bootloader");
        embassy_rp::rom_data::reset_to_usb_boot(0, 0);
    }

    // Held for the rest of the run to keep driving the mux
    let _mux = BOARD
        .pinout
        .mux
        .zip(mux_level(&holds, &BOARD.pinout))
        .map(|(gpio, high)| {
            info!("Passthrough mux {}", if high { "on" } else { "off" });
            // SAFETY: validated pinout, the mux GPIO is claimed nowhere else
            Output::new(unsafe { AnyPin::steal(gpio) }, Level::from(high))
        });

    // --- Nunchuk ---
    #[cfg(feature = "board-pico")]
    let nunchuk: Option<NunchukInput<NunchukBus>> = {
        let mut config = I2cConfig::default();
        config.frequency = 400_000;
        // GPIO 9 / 8, matching the board pinout
        Some(NunchukInput::new(I2c::new_blocking(
            p.I2C0, p.PIN_9, p.PIN_8, config,
        )))
    };
    #[cfg(not(feature = "board-pico"))]
    let nunchuk: Option<NunchukInput<NunchukBus>> = None;

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0002); // pid.codes test VID/PID
    usb_config.manufacturer = Some("joybox");
    usb_config.product = Some("joybox controller adapter");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;
    // Composite device with a CDC function needs interface association
    usb_config.device_class = 0xEF;
    usb_config.device_sub_class = 0x02;
    usb_config.device_protocol = 0x01;
    usb_config.composite_with_iads = true;

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        MSOS_DESCRIPTOR.init([0; 256]),
        CONTROL_BUF.init([0; 64]),
    );
    builder.handler(USB_HANDLER.init(UsbStateHandler));

    let dinput = configure_dinput(&mut builder, DINPUT_STATE.init(hid::State::new()));
    let keyboard = configure_keyboard(&mut builder, KEYBOARD_STATE.init(hid::State::new()));
    let viewer = configure_viewer(&mut builder, VIEWER_STATE.init(cdc_acm::State::new()));

    let usb_device = builder.build();
    spawner.spawn(usb_task(usb_device).unwrap());

    // --- Backend selection ---
    let usb_present = detect_host(BOARD.detection, usb_configured, Delay).await;
    let plan = plan_boot(&holds, usb_present, &BOARD.boot);
    info!("Boot plan: {}", plan);

    let sources = (buttons, nunchuk);
    let mode = plan.default_mode.build();

    match plan.primary.console() {
        None => {
            let primary = CommunicationBackend::with_mode(DInputOutput::new(dinput), mode);
            let viewer = CommunicationBackend::new(ViewerOutput::new(viewer));
            let mut runtime = Runtime::new(sources, primary)
                .with_secondary(viewer)
                .with_keyboard(KeyboardOutput::new(keyboard));
            runtime.run().await
        }
        Some((console, polling_rate)) => {
            let Some(core) = cortex_m::Peripherals::take() else {
                defmt::panic!("Core peripherals already taken");
            };
            let Some(gpio) = BOARD.pinout.joybus_data else {
                defmt::panic!("Board has no Joybus pin");
            };
            // SAFETY: validated pinout, the Joybus GPIO is claimed nowhere else
            let port = unsafe { RpJoybusPort::new(gpio, CycleClock::new(core.SYST)) };
            let sink = JoybusOutput::new(port, Delay, console, polling_rate);
            let mut runtime = Runtime::new(sources, CommunicationBackend::with_mode(sink, mode));
            runtime.run().await
        }
    }
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: UsbDevice<'static, UsbDriver>) {
    device.run().await;
}
