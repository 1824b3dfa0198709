//! USB composite device: DInput gamepad, boot keyboard and input viewer.
//!
//! All three classes are registered on one device so the host sees the same
//! descriptors whichever of them the boot plan ends up using. Writes are
//! bounded by [`WRITE_TIMEOUT`]; a host that stops polling costs one dropped
//! report, never a stalled frame.

use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_time::{with_timeout, Duration};
use embassy_usb::class::cdc_acm::{self, CdcAcmClass};
use embassy_usb::class::hid::{self, HidBootProtocol, HidSubclass, HidWriter};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Handler};
use joybox_core::{KeyboardSink, OutputError, OutputSink, Report};
use joybox_proto::keyboard::{self, INPUT_REPORT_SIZE as KEYBOARD_REPORT_SIZE};
use joybox_proto::{dinput, frame_to_vec, DInputReport, KeyboardReport};
use portable_atomic::{AtomicBool, Ordering};

/// USB driver type for the RP2040.
pub type UsbDriver = Driver<'static, USB>;

/// Longest time one report may wait for the host to take it.
pub const WRITE_TIMEOUT: Duration = Duration::from_millis(2);

/// Packet size of the viewer's CDC-ACM data endpoints.
const VIEWER_PACKET_SIZE: u16 = 64;

/// Set while a host has the device in the configured state.
static USB_CONFIGURED: AtomicBool = AtomicBool::new(false);

/// Whether a USB host has configured the device.
#[must_use]
pub fn usb_configured() -> bool {
    USB_CONFIGURED.load(Ordering::Relaxed)
}

/// Device-level USB event handler tracking the configured state.
#[derive(Default)]
pub struct UsbStateHandler;

impl Handler for UsbStateHandler {
    fn configured(&mut self, configured: bool) {
        USB_CONFIGURED.store(configured, Ordering::Relaxed);
        defmt::info!("USB configured: {}", configured);
    }

    fn reset(&mut self) {
        USB_CONFIGURED.store(false, Ordering::Relaxed);
    }
}

fn endpoint_error(err: EndpointError) -> OutputError {
    match err {
        EndpointError::Disabled => OutputError::NotReady,
        EndpointError::BufferOverflow => OutputError::Io,
    }
}

/// Primary backend sink for PC hosts.
pub struct DInputOutput {
    writer: HidWriter<'static, UsbDriver, { DInputReport::SIZE }>,
}

impl DInputOutput {
    pub fn new(writer: HidWriter<'static, UsbDriver, { DInputReport::SIZE }>) -> Self {
        Self { writer }
    }
}

impl OutputSink for DInputOutput {
    async fn send(&mut self, report: &Report<'_>) -> Result<(), OutputError> {
        if !usb_configured() {
            return Err(OutputError::NotReady);
        }
        let hid = DInputReport::from(&report.outputs_or_neutral());
        with_timeout(WRITE_TIMEOUT, self.writer.write(&hid.as_bytes()))
            .await
            .map_err(|_| OutputError::Dropped)?
            .map_err(endpoint_error)
    }

    fn is_ready(&self) -> bool {
        usb_configured()
    }
}

/// Keyboard side channel.
pub struct KeyboardOutput {
    writer: HidWriter<'static, UsbDriver, KEYBOARD_REPORT_SIZE>,
}

impl KeyboardOutput {
    pub fn new(writer: HidWriter<'static, UsbDriver, KEYBOARD_REPORT_SIZE>) -> Self {
        Self { writer }
    }
}

impl KeyboardSink for KeyboardOutput {
    async fn send_keys(&mut self, report: &KeyboardReport) -> Result<(), OutputError> {
        if !usb_configured() {
            return Err(OutputError::NotReady);
        }
        let bytes = keyboard::input_bytes(&report.to_hid());
        with_timeout(WRITE_TIMEOUT, self.writer.write(&bytes))
            .await
            .map_err(|_| OutputError::Dropped)?
            .map_err(endpoint_error)
    }
}

/// Diagnostic backend streaming viewer frames over a virtual serial port.
///
/// Frames are only sent while a terminal holds DTR, so an unopened port
/// costs nothing.
pub struct ViewerOutput {
    class: CdcAcmClass<'static, UsbDriver>,
}

impl ViewerOutput {
    pub fn new(class: CdcAcmClass<'static, UsbDriver>) -> Self {
        Self { class }
    }
}

impl OutputSink for ViewerOutput {
    async fn send(&mut self, report: &Report<'_>) -> Result<(), OutputError> {
        if !self.is_ready() {
            return Err(OutputError::NotReady);
        }
        let frame = frame_to_vec(report.inputs);
        with_timeout(WRITE_TIMEOUT, self.class.write_packet(&frame))
            .await
            .map_err(|_| OutputError::Dropped)?
            .map_err(endpoint_error)
    }

    fn is_ready(&self) -> bool {
        usb_configured() && self.class.dtr()
    }
}

/// Register the DInput gamepad interface.
pub fn configure_dinput(
    builder: &mut Builder<'static, UsbDriver>,
    state: &'static mut hid::State<'static>,
) -> HidWriter<'static, UsbDriver, { DInputReport::SIZE }> {
    let config = hid::Config {
        report_descriptor: dinput::REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: 1,
        max_packet_size: 16,
        hid_subclass: HidSubclass::No,
        hid_boot_protocol: HidBootProtocol::None,
    };
    HidWriter::new(builder, state, config)
}

/// Register the boot keyboard interface.
pub fn configure_keyboard(
    builder: &mut Builder<'static, UsbDriver>,
    state: &'static mut hid::State<'static>,
) -> HidWriter<'static, UsbDriver, KEYBOARD_REPORT_SIZE> {
    let config = hid::Config {
        report_descriptor: keyboard::report_descriptor(),
        request_handler: None,
        poll_ms: 1,
        max_packet_size: 8,
        hid_subclass: HidSubclass::Boot,
        hid_boot_protocol: HidBootProtocol::Keyboard,
    };
    HidWriter::new(builder, state, config)
}

/// Register the input viewer's CDC-ACM interface.
pub fn configure_viewer(
    builder: &mut Builder<'static, UsbDriver>,
    state: &'static mut cdc_acm::State<'static>,
) -> CdcAcmClass<'static, UsbDriver> {
    CdcAcmClass::new(builder, state, VIEWER_PACKET_SIZE)
}
