//! Query strings understood by the hub's `json.htm` endpoint.

use vsure_domain::command::HubCommand;
use vsure_domain::sensor_index::SensorIndex;

/// Device details, including `LastUpdate`.
#[must_use]
pub fn device_info(idx: &SensorIndex) -> String {
    format!("type=devices&rid={idx}")
}

/// The update request for `command`.
#[must_use]
pub fn command(command: &HubCommand) -> String {
    match command {
        HubCommand::UpdateValue { idx, svalue } => {
            format!("type=command&param=udevice&idx={idx}&nvalue=0&svalue={svalue}")
        }
        HubCommand::Switch { idx, command } => {
            format!("type=command&param=switchlight&idx={idx}&switchcmd={command}")
        }
        HubCommand::SetLevel { idx, level } => {
            format!("type=command&param=switchlight&idx={idx}&switchcmd=Set%20Level&level={level}")
        }
    }
}

#[cfg(test)]
mod tests {
    use vsure_domain::command::SwitchCommand;

    use super::*;

    fn idx(value: &str) -> SensorIndex {
        SensorIndex::new(value)
    }

    #[test]
    fn should_build_device_info_query() {
        assert_eq!(device_info(&idx("42")), "type=devices&rid=42");
    }

    #[test]
    fn should_build_update_value_query() {
        let query = command(&HubCommand::UpdateValue {
            idx: idx("7"),
            svalue: "21.5;60;0".to_string(),
        });
        assert_eq!(
            query,
            "type=command&param=udevice&idx=7&nvalue=0&svalue=21.5;60;0"
        );
    }

    #[test]
    fn should_build_switch_query() {
        let on = command(&HubCommand::Switch {
            idx: idx("3"),
            command: SwitchCommand::On,
        });
        assert_eq!(on, "type=command&param=switchlight&idx=3&switchcmd=On");

        let verbatim = command(&HubCommand::Switch {
            idx: idx("5"),
            command: SwitchCommand::Verbatim("ON".to_string()),
        });
        assert_eq!(verbatim, "type=command&param=switchlight&idx=5&switchcmd=ON");
    }

    #[test]
    fn should_build_set_level_query() {
        let query = command(&HubCommand::SetLevel {
            idx: idx("13"),
            level: 20,
        });
        assert_eq!(
            query,
            "type=command&param=switchlight&idx=13&switchcmd=Set%20Level&level=20"
        );
    }
}
