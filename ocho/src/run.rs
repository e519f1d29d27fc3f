use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use log::{error, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use ocho_core::{Machine, RunState};
use ocho_display::Display;

use crate::keymap::keymap;
use crate::Args;

/// Drive the machine until it halts: poll input, run one cycle unless
/// paused, sleep toward the target instruction rate, render one frame.
///
/// The core never transitions its own run state; quits and pauses land here
/// via SDL events, and a machine fault is logged and turned into a halt.
pub fn run(args: &Args, rom: &[u8]) -> Result<()> {
    let mut machine = Machine::new();
    machine.load_rom(rom)?;

    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, args.scale, args.fg, args.bg, !args.no_outlines)
        .map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let cycle_time = Duration::from_secs(1) / args.clock_hz;
    let mut last_cycle = Instant::now();

    while machine.run_state() != RunState::Halted {
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => machine.set_run_state(RunState::Halted),
                Event::KeyDown {
                    keycode: Some(Keycode::Space),
                    ..
                } => {
                    let next = machine.run_state().toggled();
                    match next {
                        RunState::Paused => info!("paused"),
                        RunState::Running => info!("resumed"),
                        RunState::Halted => {}
                    }
                    machine.set_run_state(next);
                }
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        machine.key_press(kc);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        machine.key_release(kc);
                    }
                }
                _ => {}
            }
        }

        if machine.run_state() == RunState::Running {
            if let Err(fault) = machine.cycle() {
                error!("{fault}; halting");
                machine.set_run_state(RunState::Halted);
            }
        }

        let now = Instant::now();
        let elapsed = now - last_cycle;
        if cycle_time > elapsed {
            std::thread::sleep(cycle_time - elapsed);
        }
        last_cycle = now;

        display.render(machine.frame_buffer()).map_err(|e| anyhow!(e))?;
    }

    Ok(())
}
