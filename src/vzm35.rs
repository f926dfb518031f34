//! Parameter table and fixed identities of the Inovelli VZM35-SN fan controller.

use crate::schema::{ParameterDescriptor, ParameterSchema, SchemaError};
use crate::wire::{Cluster, WireType};

/// Endpoint carrying on/off, level control and the parameter cluster.
pub const CONTROL_ENDPOINT: u8 = 1;
/// Endpoint that emits button scene events.
pub const EVENT_ENDPOINT: u8 = 2;
/// Manufacturer command id of a button scene event.
pub const SCENE_EVENT_COMMAND: u8 = 0x00;

/// Clusters bound on [`CONTROL_ENDPOINT`] for state reporting.
pub const CONTROL_BINDINGS: [Cluster; 2] = [Cluster::OnOff, Cluster::LevelControl];
/// Clusters bound on [`EVENT_ENDPOINT`] for button events.
pub const EVENT_BINDINGS: [Cluster; 1] = [Cluster::Inovelli];

const ENABLE_DISABLE: [(&str, u32); 2] = [("Disabled", 0), ("Enabled", 1)];

const LED_COLORS: [(&str, u32); 9] = [
    ("Red", 0),
    ("Orange", 21),
    ("Yellow", 42),
    ("Green", 85),
    ("Cyan", 127),
    ("Blue", 170),
    ("Violet", 212),
    ("Pink", 234),
    ("White", 255),
];

/// First attribute id of each LED strip segment's four defaults.
const LED_SEGMENT_BASE_IDS: [(u8, u16); 7] = [
    (1, 60),
    (2, 65),
    (3, 70),
    (4, 75),
    (5, 80),
    (6, 85),
    (7, 90),
];

/// Builds the validated parameter schema of the device.
pub fn schema() -> Result<ParameterSchema, SchemaError> {
    ParameterSchema::new(descriptors())
}

fn ramp(name: &str, id: u16, what: &str) -> ParameterDescriptor {
    ParameterDescriptor::bounded(name, id, WireType::Uint8, 0, 127).with_description(format!(
        "Speed at which the fan {what}. 0 is instant; every step adds 100ms."
    ))
}

fn descriptors() -> Vec<ParameterDescriptor> {
    let mut out = vec![
        ramp("dimmingSpeedUpRemote", 1, "speeds up when controlled from the hub"),
        ramp("dimmingSpeedUpLocal", 2, "speeds up when controlled at the switch"),
        ramp("rampRateOffToOnRemote", 3, "turns on when controlled from the hub"),
        ramp("rampRateOffToOnLocal", 4, "turns on when controlled at the switch"),
        ramp("dimmingSpeedDownRemote", 5, "slows down when controlled from the hub"),
        ramp("dimmingSpeedDownLocal", 6, "slows down when controlled at the switch"),
        ramp("rampRateOnToOffRemote", 7, "turns off when controlled from the hub"),
        ramp("rampRateOnToOffLocal", 8, "turns off when controlled at the switch"),
        ParameterDescriptor::bounded("minimumLevel", 9, WireType::Uint8, 1, 253)
            .with_description("The minimum level that the fan can be set to."),
        ParameterDescriptor::bounded("maximumLevel", 10, WireType::Uint8, 2, 255)
            .with_description("The maximum level that the fan can be set to."),
        ParameterDescriptor::enumerated(
            "invertSwitch",
            11,
            WireType::Boolean,
            [("Yes", 1), ("No", 0)],
        )
        .with_description(
            "Inverts the orientation of the switch; up becomes down and down becomes up.",
        ),
        ParameterDescriptor::bounded("autoTimerOff", 12, WireType::Uint16, 0, 32767)
            .with_presets([("Disabled", 0)])
            .with_unit("seconds")
            .with_description(
                "Turns the fan off this many seconds after it was turned on. 0 disables the timer.",
            ),
        ParameterDescriptor::bounded("defaultLevelLocal", 13, WireType::Uint8, 0, 255)
            .with_description(
                "Level used when turned on at the switch. 0 restores the previous level.",
            ),
        ParameterDescriptor::bounded("defaultLevelRemote", 14, WireType::Uint8, 0, 255)
            .with_description(
                "Level used when turned on from the hub. 0 restores the previous level.",
            ),
        ParameterDescriptor::bounded("stateAfterPowerRestored", 15, WireType::Uint8, 0, 255)
            .with_description(
                "State after a power failure. 0 = off, 1-100 = level, 101 = previous.",
            ),
        ParameterDescriptor::enumerated(
            "loadLevelIndicatorTimeout",
            17,
            WireType::Uint8,
            [
                ("Stay Off", 0),
                ("1 Second", 1),
                ("2 Seconds", 2),
                ("3 Seconds", 3),
                ("4 Seconds", 4),
                ("5 Seconds", 5),
                ("6 Seconds", 6),
                ("7 Seconds", 7),
                ("8 Seconds", 8),
                ("9 Seconds", 9),
                ("10 Seconds", 10),
                ("Stay On", 11),
            ],
        )
        .with_description("How long the LED bar shows the load level after it changes."),
        ParameterDescriptor::enumerated(
            "switchType",
            22,
            WireType::Uint8,
            [("Load Only", 0), ("Aux", 1)],
        )
        .with_description("Set the switch configuration."),
        ParameterDescriptor::bounded("quickStartTime", 23, WireType::Uint8, 0, 10)
            .with_description(
                "Duration until full power output when the fan transitions from off to on.",
            ),
        ParameterDescriptor::enumerated(
            "buttonDelay",
            50,
            WireType::Uint8,
            [
                ("0ms", 0),
                ("300ms", 3),
                ("400ms", 4),
                ("500ms", 5),
                ("600ms", 6),
                ("700ms", 7),
                ("800ms", 8),
                ("900ms", 9),
            ],
        )
        .with_description("Button press delay. 0ms disables button press events."),
        ParameterDescriptor::enumerated(
            "smartBulbMode",
            52,
            WireType::Boolean,
            [("Disabled", 0), ("Smart Fan Mode", 1)],
        )
        .with_description(
            "For smart fans that need constant power and are controlled by commands.",
        ),
        ParameterDescriptor::enumerated(
            "doubleTapUpToParam55",
            53,
            WireType::Boolean,
            ENABLE_DISABLE,
        )
        .with_description("Set the level from parameter 55 on double-tap up."),
        ParameterDescriptor::enumerated(
            "doubleTapDownToParam56",
            54,
            WireType::Boolean,
            ENABLE_DISABLE,
        )
        .with_description("Set the level from parameter 56 on double-tap down."),
        ParameterDescriptor::bounded("brightnessLevelForDoubleTapUp", 55, WireType::Uint8, 2, 254)
            .with_description("Level set on double-tap up, if enabled by parameter 53."),
        ParameterDescriptor::bounded("brightnessLevelForDoubleTapDown", 56, WireType::Uint8, 0, 254)
            .with_description("Level set on double-tap down, if enabled by parameter 54."),
        ParameterDescriptor::bounded("ledColorWhenOn", 95, WireType::Uint8, 0, 255)
            .with_presets(LED_COLORS)
            .with_description("Color of the LED indicator when the load is on."),
        ParameterDescriptor::bounded("ledColorWhenOff", 96, WireType::Uint8, 0, 255)
            .with_presets(LED_COLORS)
            .with_description("Color of the LED indicator when the load is off."),
        ParameterDescriptor::bounded("ledIntensityWhenOn", 97, WireType::Uint8, 0, 100)
            .with_description("Intensity of the LED indicator when the load is on."),
        ParameterDescriptor::bounded("ledIntensityWhenOff", 98, WireType::Uint8, 0, 100)
            .with_description("Intensity of the LED indicator when the load is off."),
        ParameterDescriptor::enumerated("localProtection", 256, WireType::Boolean, ENABLE_DISABLE)
            .with_description("Ability to control the switch from the wall."),
        ParameterDescriptor::enumerated("remoteProtection", 257, WireType::Boolean, ENABLE_DISABLE)
            .read_only()
            .with_description("Ability to control the switch from the hub."),
        ParameterDescriptor::enumerated(
            "outputMode",
            258,
            WireType::Boolean,
            [("Fan Controller", 0), ("On/Off", 1)],
        )
        .with_description(
            "Use the device as a speed selectable fan controller or an on/off switch.",
        ),
        ParameterDescriptor::enumerated(
            "onOffLedMode",
            259,
            WireType::Boolean,
            [("All", 0), ("One", 1)],
        )
        .with_description("In on/off mode, use the full LED bar or just one LED."),
        ParameterDescriptor::enumerated(
            "firmwareUpdateInProgressIndicator",
            260,
            WireType::Boolean,
            ENABLE_DISABLE,
        )
        .with_description("Display progress on the LED bar during a firmware update."),
    ];

    for (led, base) in LED_SEGMENT_BASE_IDS {
        out.extend(led_segment(led, base));
    }

    out
}

fn led_segment(led: u8, base: u16) -> [ParameterDescriptor; 4] {
    let color = |suffix: &str, id: u16| {
        ParameterDescriptor::bounded(
            format!("defaultLed{led}Color{suffix}"),
            id,
            WireType::Uint8,
            0,
            255,
        )
        .with_description("0-254: color of the LED strip segment. 255: follow the all-LED color.")
    };
    let intensity = |suffix: &str, id: u16| {
        ParameterDescriptor::bounded(
            format!("defaultLed{led}Intensity{suffix}"),
            id,
            WireType::Uint8,
            0,
            101,
        )
        .with_description("Intensity of the LED strip segment. 101: follow the all-LED intensity.")
    };

    [
        color("WhenOn", base),
        color("WhenOff", base + 1),
        intensity("WhenOn", base + 2),
        intensity("WhenOff", base + 3),
    ]
}
