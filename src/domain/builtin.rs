//! The built-in procedure catalogue.
//!
//! Assembled once, on first access, and shared read-only for the life of the
//! process.

use std::sync::LazyLock;

use crate::domain::{
    BuildError, Catalogue, Category, Procedure,
    Role::{PayloadOperator, RemotePilot, VisualObserver},
};

/// The identifier of the flight termination procedure.
pub(crate) const TERMINATION_ID: &str = "E5";

static CATALOGUE: LazyLock<Catalogue> = LazyLock::new(|| {
    let procedures = procedures().expect("built-in procedures are well-formed");
    Catalogue::new(procedures).expect("built-in procedure IDs are unique")
});

/// The built-in catalogue.
#[must_use]
pub fn catalogue() -> &'static Catalogue {
    &CATALOGUE
}

#[allow(clippy::too_many_lines)]
fn procedures() -> Result<Vec<Procedure>, BuildError> {
    use Category::{Contingency, Emergency, Erp, Normal};

    Ok(vec![
        // Normal
        Procedure::builder("N1", Normal)
            .title("Pre-Flight Checks")
            .short_title("Pre-Flight")
            .description("Site, crew and aircraft checks completed before every flight.")
            .general_note("Complete the site survey before unpacking the aircraft.")
            .general_note("Any failed check is a no-go until rectified.")
            .action(
                RemotePilot,
                [
                    "Confirm airspace authorisation and NOTAMs",
                    "Check weather against aircraft limits",
                    "Inspect airframe, propellers and battery condition",
                    "Power on ground control station and confirm C2 link",
                    "Confirm return-to-home point and altitude set",
                    "Call Out: \"Pre-flight complete\"",
                ],
            )
            .action(
                VisualObserver,
                [
                    "Brief crew on site hazards and emergency landing areas",
                    "Establish cordon and confirm take-off area is clear",
                ],
            )
            .action(
                PayloadOperator,
                ["Check payload mounting and gimbal free movement"],
            )
            .conditional(
                "Any check fails",
                "Do not fly. Rectify and repeat the checks.",
            )
            .build()?,
        Procedure::builder("N2", Normal)
            .title("Launch")
            .description("Take-off and initial climb to operating altitude.")
            .action(
                RemotePilot,
                [
                    "Call Out: \"Clear to launch?\"",
                    "Arm motors",
                    "Take off and hold a low hover",
                    "Check controls respond correctly",
                    "Call Out: \"Climbing\"",
                ],
            )
            .action(
                VisualObserver,
                [
                    "Confirm airspace and launch area clear",
                    "Call Out: \"Clear\"",
                ],
            )
            .conditional_ref(
                "Abnormal control response in the hover",
                "Land immediately and investigate.",
                "C3",
            )
            .build()?,
        Procedure::builder("N3", Normal)
            .title("In-Flight Operations")
            .short_title("In-Flight")
            .description("Conduct of the task once at operating altitude.")
            .general_note("Maintain visual line of sight at all times.")
            .action(
                RemotePilot,
                [
                    "Monitor battery, link quality and satellite count",
                    "Maintain separation from people, vehicles and structures",
                    "Call Out: \"Battery at 50 percent\"",
                ],
            )
            .action(
                VisualObserver,
                [
                    "Scan airspace for manned aircraft",
                    "Report any intrusion into the operating area",
                ],
            )
            .action(PayloadOperator, ["Operate payload as briefed"])
            .conditional_ref(
                "C2 link lost",
                "Follow the lost link procedure.",
                "C1",
            )
            .conditional_ref(
                "Manned aircraft approaching",
                "Descend and give way.",
                "C2",
            )
            .conditional_ref(
                "Battery reaches reserve",
                "Return and land.",
                "C4",
            )
            .build()?,
        Procedure::builder("N4", Normal)
            .title("Recovery and Landing")
            .short_title("Landing")
            .description("Return to the landing area and shut down.")
            .action(
                RemotePilot,
                [
                    "Call Out: \"Recovering\"",
                    "Approach landing area at low speed",
                    "Land and disarm motors",
                    "Call Out: \"Motors safe\"",
                ],
            )
            .action(
                VisualObserver,
                ["Confirm landing area remains clear"],
            )
            .build()?,
        Procedure::builder("N5", Normal)
            .title("Post-Flight")
            .description("Shutdown, inspection and records.")
            .action(
                RemotePilot,
                [
                    "Remove battery and inspect for swelling or heat",
                    "Inspect airframe and propellers",
                    "Record flight time and any defects in the log",
                ],
            )
            .note("Defects must be recorded before the next flight.")
            .build()?,
        // Contingency
        Procedure::builder("C1", Contingency)
            .title("Loss of C2 Link")
            .short_title("Lost Link")
            .description("The command and control link to the aircraft is lost.")
            .general_note("The aircraft is configured to return home after 5 seconds without link.")
            .action(
                RemotePilot,
                [
                    "Call Out: \"Lost link\"",
                    "Check ground control station antennas and power",
                    "Move towards the aircraft's last known position if safe",
                    "Monitor the aircraft for return-to-home behaviour",
                ],
            )
            .action(
                VisualObserver,
                [
                    "Keep the aircraft in sight",
                    "Call Out: \"Aircraft returning\" or \"Aircraft not returning\"",
                ],
            )
            .conditional(
                "Link re-established",
                "Resume control and land as soon as practicable.",
            )
            .conditional_ref(
                "Aircraft does not return home",
                "Treat as a fly-away.",
                "E1",
            )
            .build()?,
        Procedure::builder("C2", Contingency)
            .title("Airspace Conflict")
            .description("A manned aircraft is approaching the operating area.")
            .action(
                VisualObserver,
                ["Call Out: \"Traffic, <direction>, <height>\""],
            )
            .action(
                RemotePilot,
                [
                    "Descend to the lowest safe height",
                    "Hold position clear of the traffic's track",
                    "Call Out: \"Descending, holding\"",
                ],
            )
            .conditional(
                "Traffic clears the area",
                "Resume operations.",
            )
            .conditional_ref(
                "Collision is imminent",
                "Terminate the flight.",
                "E5",
            )
            .build()?,
        Procedure::builder("C3", Contingency)
            .title("Loss of GNSS")
            .short_title("GNSS Loss")
            .description("Satellite positioning is lost or degraded.")
            .action(
                RemotePilot,
                [
                    "Call Out: \"GNSS lost, attitude mode\"",
                    "Fly manually using visual references",
                    "Return towards the landing area",
                ],
            )
            .action(VisualObserver, ["Call out drift direction to the pilot"])
            .conditional_ref(
                "Aircraft cannot be controlled",
                "Follow the loss of control procedure.",
                "E3",
            )
            .build()?,
        Procedure::builder("C4", Contingency)
            .title("Low Battery")
            .description("Battery has reached the landing reserve.")
            .action(
                RemotePilot,
                [
                    "Call Out: \"Battery reserve\"",
                    "Cease task and return to the landing area",
                ],
            )
            .conditional_ref(
                "Battery falls to critical before landing",
                "Land at the nearest safe area.",
                "C4.1",
            )
            .build()?,
        Procedure::builder("C4.1", Contingency)
            .title("Critical Battery")
            .description("Battery voltage is below the critical threshold.")
            .general_note("The aircraft may initiate an automatic landing at this level.")
            .action(
                RemotePilot,
                [
                    "Call Out: \"Critical battery, landing now\"",
                    "Select the nearest clear landing area",
                    "Descend and land immediately",
                ],
            )
            .action(
                VisualObserver,
                ["Clear people from the selected landing area"],
            )
            .conditional_ref(
                "Aircraft descends uncontrolled",
                "Follow the uncontrolled descent procedure.",
                "E4",
            )
            .build()?,
        Procedure::builder("C5", Contingency)
            .title("Deteriorating Weather")
            .short_title("Weather")
            .description("Wind, precipitation or visibility approaching limits.")
            .action(
                RemotePilot,
                [
                    "Call Out: \"Weather, recovering\"",
                    "Reduce height and return to the landing area",
                ],
            )
            .conditional_ref(
                "Visual line of sight is lost",
                "Follow the lost link procedure if control is affected.",
                "C1",
            )
            .build()?,
        // Emergency
        Procedure::builder("E1", Emergency)
            .title("Fly-Away")
            .description("The aircraft is not responding to control and is leaving the operating area.")
            .action(
                RemotePilot,
                [
                    "Call Out: \"Fly-away\"",
                    "Attempt to regain control: mode switch, return-to-home command",
                    "Note time, heading, height and remaining battery",
                ],
            )
            .action(
                VisualObserver,
                [
                    "Track the aircraft for as long as possible",
                    "Call Out: \"Aircraft heading <direction>\"",
                ],
            )
            .conditional(
                "Control regained",
                "Land as soon as possible.",
            )
            .conditional_ref(
                "Aircraft heading towards people or controlled airspace",
                "Terminate the flight.",
                "E5",
            )
            .conditional_ref(
                "Aircraft lost from sight",
                "Notify air traffic control and the police.",
                "ERP-NOT",
            )
            .build()?,
        Procedure::builder("E2", Emergency)
            .title("Fire in Flight")
            .short_title("Fire")
            .description("Smoke or fire observed from the aircraft.")
            .action(
                RemotePilot,
                [
                    "Call Out: \"Fire\"",
                    "Land immediately away from people and combustibles",
                    "Disarm motors",
                ],
            )
            .action(
                VisualObserver,
                ["Keep people clear of the aircraft"],
            )
            .conditional_ref(
                "Aircraft lands and continues burning",
                "Follow the ground fire response.",
                "ERP-FIRE",
            )
            .build()?,
        Procedure::builder("E3", Emergency)
            .title("Loss of Control")
            .description("The aircraft is not responding correctly to control inputs.")
            .action(
                RemotePilot,
                [
                    "Call Out: \"Loss of control\"",
                    "Centre the sticks and switch flight mode",
                    "Command return-to-home",
                ],
            )
            .conditional_ref(
                "Aircraft leaves the operating area",
                "Treat as a fly-away.",
                "E1",
            )
            .conditional_ref(
                "No response to any input",
                "Terminate the flight.",
                "E5",
            )
            .build()?,
        Procedure::builder("E4", Emergency)
            .title("Uncontrolled Descent")
            .description("The aircraft is falling and cannot be arrested.")
            .action(
                RemotePilot,
                ["Call Out: \"Aircraft falling\"", "Sound warning to people below"],
            )
            .action(
                VisualObserver,
                [
                    "Call Out: \"Heads up\"",
                    "Note the impact point",
                ],
            )
            .conditional_ref(
                "Person struck or injured",
                "Provide first aid.",
                "ERP-FA",
            )
            .conditional_ref(
                "Aircraft on fire after impact",
                "Follow the ground fire response.",
                "ERP-FIRE",
            )
            .build()?,
        Procedure::builder("E5", Emergency)
            .title("Flight Termination")
            .short_title("Terminate")
            .description(
                "Deliberately end the flight to prevent a worse outcome. This is the final \
                 action when all other options are exhausted.",
            )
            .general_note("Terminating the flight will destroy or seriously damage the aircraft.")
            .action(
                RemotePilot,
                [
                    "Call Out: \"Terminating\"",
                    "Confirm the area beneath the aircraft is clear",
                    "Activate flight termination",
                ],
            )
            .action(
                VisualObserver,
                [
                    "Warn people in the vicinity",
                    "Note the impact point",
                ],
            )
            .conditional_ref(
                "Person struck or injured",
                "Provide first aid.",
                "ERP-FA",
            )
            .note("Report every flight termination as an occurrence.")
            .build()?,
        // Emergency response plan
        Procedure::builder("ERP-FA", Erp)
            .title("First Aid")
            .description("A person has been injured by the aircraft.")
            .action(
                RemotePilot,
                [
                    "Make the aircraft safe: disarm and remove battery",
                    "Call emergency services",
                ],
            )
            .action(
                VisualObserver,
                [
                    "Provide first aid within your training",
                    "Guide emergency services to the casualty",
                ],
            )
            .conditional_ref(
                "After the casualty is handed over",
                "Complete the notifications.",
                "ERP-NOT",
            )
            .build()?,
        Procedure::builder("ERP-FIRE", Erp)
            .title("Ground Fire")
            .description("The aircraft or its battery is burning on the ground.")
            .general_note("Lithium battery fires can reignite hours later.")
            .action(
                RemotePilot,
                [
                    "Call emergency services",
                    "Do not approach a burning battery",
                ],
            )
            .action(
                VisualObserver,
                ["Establish a cordon upwind of the fire"],
            )
            .conditional_ref(
                "Fire extinguished",
                "Complete the notifications.",
                "ERP-NOT",
            )
            .build()?,
        Procedure::builder("ERP-NOT", Erp)
            .title("Occurrence Notification")
            .short_title("Notify")
            .description("Notifications required after an accident or serious incident.")
            .action(
                RemotePilot,
                [
                    "Notify air traffic control if the aircraft may enter controlled airspace",
                    "Notify the operator's accountable manager",
                    "Submit a mandatory occurrence report",
                ],
            )
            .note("Preserve logs and the aircraft for investigation.")
            .build()?,
    ])
}
