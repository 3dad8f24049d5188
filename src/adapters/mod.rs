//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements               | Connects to                 |
//! |------------|--------------------------|-----------------------------|
//! | `hardware` | SensorPort, ActuatorPort | embedded-hal pins and PWM   |
//! | `board`    | (builds `hardware`)      | ESP32-S3 GPIO / LEDC        |
//! | `sim`      | SensorPort, ActuatorPort | in-memory world model       |
//! | `log_sink` | EventSink                | Serial / stderr log output  |
//! | `time`     | ClockPort, MicrosClock   | esp_timer / `Instant`       |
//! | `console`  | (feeds `CommandBus`)     | stdin / UART console        |

#[cfg(target_os = "espidf")]
pub mod board;
pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod sim;
pub mod time;
