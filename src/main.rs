use anyhow::{Context, Result};
use input_bridge::platform::sim::{SimGamepad, SimPadState, SimPlatform};
use input_bridge::platform::{PadAxis, PadButton, PlatformEvent, TouchFinger, TouchPhase};
use input_bridge::{DeadZoneMode, InputBridge, Key};
use log::info;

// Headless demo: scripts a few frames of platform traffic against the
// simulated backend and prints the polled state the game would read.

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let frames: u32 = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid frame count {:?}", arg))?,
        None => 3,
    };

    info!("Starting input bridge demo for {} frames...", frames);

    let mut platform = SimPlatform::new();
    let pad = SimGamepad::new(SimPadState::new(42));
    platform.attach_gamepad(0, pad.clone());

    let mut bridge = InputBridge::new(platform);

    for frame in 0..frames {
        script_frame(&mut bridge, &pad, frame);

        bridge.poll_events();
        bridge.update_touch_panel();

        let pad_state = bridge.gamepad_state(0, DeadZoneMode::IndependentAxes);
        info!(
            "frame {}: space={} pad(connected={} packet={} left_stick={:?} buttons={:?})",
            frame,
            bridge.is_key_down(Key::Space),
            pad_state.is_connected,
            pad_state.packet_number,
            pad_state.left_stick,
            pad_state.buttons,
        );

        let mouse = bridge.mouse_state();
        info!(
            "frame {}: mouse at ({}, {}) wheel={} touches={}",
            frame,
            mouse.x,
            mouse.y,
            mouse.scroll_wheel,
            bridge.touch_panel().finger_count(),
        );

        let signals = bridge.take_signals();
        if signals.quit_requested {
            info!("quit requested, shutting down...");
            break;
        }
    }

    Ok(())
}

/// Queue this frame's scripted platform traffic
fn script_frame(bridge: &mut InputBridge<SimPlatform>, pad: &SimGamepad, frame: u32) {
    let platform = bridge.platform_mut();
    match frame {
        0 => {
            platform.push_events([
                PlatformEvent::GamepadAdded { device_index: 0 },
                PlatformEvent::KeyDown {
                    keycode: 0x20,
                    scancode: 44,
                    repeat: false,
                },
                PlatformEvent::MouseWheel { x: 0, y: 1 },
            ]);
        }
        1 => {
            platform.set_fingers(vec![TouchFinger {
                id: 1,
                x: 0.5,
                y: 0.25,
            }]);
            platform.push_event(PlatformEvent::Finger {
                phase: TouchPhase::Began,
                finger_id: 1,
                x: 0.5,
                y: 0.25,
            });
            let mut state = pad.state_mut();
            state.axes.insert(PadAxis::LeftX, 24000);
            state.pressed.insert(PadButton::A);
        }
        _ => {
            platform.push_event(PlatformEvent::Quit);
        }
    }
}
