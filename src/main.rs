// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::{
    interrupt::{free, Mutex},
    peripheral::NVIC,
};
use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    pac::{self, interrupt},
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use motor_hat::{
    config::{DEBUG_BAUD, I2C_ADDRESS},
    control::PwmEngine,
    hw::{self, BoardPins, I2cSlave, TimeBase, Usart},
    motors::{RegisterFile, BOARD_CHANNEL_PINS},
    protocol::{self, BusHandler},
};

/// Registers shared between the bus interrupts and the PWM loop.
static REGISTERS: RegisterFile = RegisterFile::new();

/// Bus state, owned by the I2C interrupts once the main loop starts.
struct Bus {
    slave: I2cSlave,
    handler: BusHandler,
}

static BUS: Mutex<RefCell<Option<Bus>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();

    // Clocks (16 MHz HSI; the I2C timing and time base prescaler assume it)
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    // GPIO
    let pins = BoardPins::new(dp.GPIOB, dp.GPIOD, dp.GPIOF);
    let mut outputs = pins.outputs;

    // USART3 (DBG)
    let usart_cfg = Config {
        baud_rate: DEBUG_BAUD.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART3, (pins.usart3.tx, pins.usart3.rx), &clocks, usart_cfg);
    hw::init_logger(Usart::new(serial));

    // PWM
    let mut pwm = PwmEngine::new(BOARD_CHANNEL_PINS);
    pwm.init(&REGISTERS, &mut outputs);
    let timebase = TimeBase::tim3(dp.TIM3);

    // I2C1
    let slave = I2cSlave::new(dp.I2C1, I2C_ADDRESS);
    free(|cs| {
        BUS.borrow(cs).replace(Some(Bus {
            slave,
            handler: BusHandler::new(),
        }))
    });
    unsafe {
        NVIC::unmask(interrupt::I2C1_EV);
        NVIC::unmask(interrupt::I2C1_ER);
    }

    log::info!("motor-hat ready at i2c address {:#04x}", I2C_ADDRESS);

    loop {
        pwm.poll(timebase.now(), &REGISTERS, &mut outputs);
    }
}

fn service_bus() {
    free(|cs| {
        if let Some(bus) = BUS.borrow(cs).borrow_mut().as_mut() {
            protocol::service_all(&mut bus.handler, &mut bus.slave, &REGISTERS);
        }
    });
}

#[interrupt]
fn I2C1_EV() {
    service_bus();
}

#[interrupt]
fn I2C1_ER() {
    service_bus();
}
