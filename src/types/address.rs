// ABOUTME: Candidate and resolved addresses for the target controller.
// ABOUTME: Strategy order here is the order discovery tries them in.

use super::team::TeamNumber;
use serde::Serialize;
use std::fmt;

/// Fixed address of the controller over its USB network gadget.
pub const USB_HOST: &str = "172.22.11.2";

/// How a target address was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Usb,
    Mdns,
    SubnetIp,
    None,
}

impl Strategy {
    /// Strategies in the order discovery tries them.
    pub const PRIORITY: [Strategy; 3] = [Strategy::Mdns, Strategy::Usb, Strategy::SubnetIp];

    /// The host this strategy would use for a team, if any.
    pub fn host_for(&self, team: TeamNumber) -> Option<String> {
        match self {
            Strategy::Mdns => Some(team.mdns_host()),
            Strategy::Usb => Some(USB_HOST.to_string()),
            Strategy::SubnetIp => Some(team.subnet_host()),
            Strategy::None => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Usb => "USB",
            Strategy::Mdns => "mDNS",
            Strategy::SubnetIp => "IP",
            Strategy::None => "none",
        };
        write!(f, "{name}")
    }
}

/// Where the target was (or was not) found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetAddress {
    pub strategy: Strategy,
    pub host: String,
    pub reachable: bool,
}

impl TargetAddress {
    pub fn reachable(strategy: Strategy, host: impl Into<String>) -> Self {
        Self {
            strategy,
            host: host.into(),
            reachable: true,
        }
    }

    pub fn none() -> Self {
        Self {
            strategy: Strategy::None,
            host: String::new(),
            reachable: false,
        }
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reachable {
            write!(f, "{} ({})", self.host, self.strategy)
        } else {
            write!(f, "unreachable")
        }
    }
}
