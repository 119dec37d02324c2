//! Enumerated mDot settings and their exact wire tokens.
//!
//! Each option type is the single source of truth for its code ↔ name
//! mapping: `token()` gives the characters written after `=`, and
//! `FromStr` parses them back.

use std::fmt;
use std::str::FromStr;

use crate::domain::MdotError;

/// Baud rates accepted by `AT+IPR`.
pub const SERIAL_SPEEDS: &[u32] = &[
    1200, 2400, 4800, 9600, 19200, 38400, 57600, 115_200, 230_400, 460_800, 921_600,
];

/// Baud rates accepted by `AT+DIPR` (the debug port has no 1200).
pub const DEBUG_SERIAL_SPEEDS: &[u32] = &[
    2400, 4800, 9600, 19200, 38400, 57600, 115_200, 230_400, 460_800, 921_600,
];

macro_rules! wire_option {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in wire-code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The exact characters sent on the wire.
            pub fn token(&self) -> &'static str {
                match self {
                    $( $name::$variant => $token ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = MdotError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $( $token => Ok($name::$variant), )+
                    other => Err(MdotError::out_of_range(
                        $label,
                        format!("unknown token '{other}'"),
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

wire_option! {
    /// LoRaWAN 1.0 device class (`AT+DC`).
    DeviceClass, "DeviceClass" {
        /// Bi-directional end devices
        A => "A",
        /// Scheduled receive slots
        B => "B",
        /// Maximal receive slots
        C => "C",
    }
}

wire_option! {
    /// Receive output format (`AT+RXO`).
    DataFormat, "DataFormat" {
        Hex => "0",
        Raw => "1",
    }
}

wire_option! {
    /// Network join mode (`AT+NJM`).
    JoinMode, "JoinMode" {
        Manual => "0",
        /// Default
        Ota => "1",
        /// Joins immediately on start-up; configure OTA settings first.
        AutoOta => "2",
        PeerToPeer => "3",
    }
}

wire_option! {
    /// Byte order of the device EUI in join requests (`AT+JBO`).
    JoinByteOrder, "JoinByteOrder" {
        Lsb => "0",
        Msb => "1",
    }
}

wire_option! {
    /// Debug port verbosity (`AT+LOG`).
    LogLevel, "LogLevel" {
        Off => "0",
        Fatal => "1",
        Error => "2",
        Warning => "3",
        Info => "4",
        Debug => "5",
        Trace => "6",
    }
}

wire_option! {
    /// Forward error correction redundancy (`AT+FEC`).
    FecRedundancy, "FecRedundancy" {
        /// 4/5
        FiveBits => "1",
        /// 4/6
        SixBits => "2",
        /// 4/7
        SevenBits => "3",
        /// 4/8
        EightBits => "4",
    }
}

wire_option! {
    /// Power-up operation mode (`AT+SMODE`).
    DataMode, "DataMode" {
        At => "0",
        Serial => "1",
    }
}

wire_option! {
    /// Sleep depth (`AT+SLEEP`).
    SleepMode, "SleepMode" {
        /// ST Micro standby
        DeepSleep => "0",
        /// ST Micro stop mode
        Stop => "1",
    }
}

wire_option! {
    /// Wake behaviour (`AT+WM`).
    WakeMode, "WakeMode" {
        DeepSleep => "0",
        Stop => "1",
    }
}

wire_option! {
    /// How the network id/key argument is interpreted (`AT+NI`, `AT+NK`).
    KeyType, "KeyType" {
        Hex => "0",
        Passphrase => "1",
    }
}

/// `1`/`0` token for on/off settings.
pub fn flag_token(on: bool) -> &'static str {
    if on {
        "1"
    } else {
        "0"
    }
}
