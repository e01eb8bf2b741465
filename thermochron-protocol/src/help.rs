//! Console help text

/// Banner printed before the first help text after boot
const BANNER: &[&str] = &[
    concat!("Thermochron v", env!("CARGO_PKG_VERSION")),
    "Heated chamber controller",
    "",
];

const TEXT: &[&str] = &[
    "Syntax: [MODE] [PARAM] [VALUE](in \"set\" mode)",
    "Modes:",
    "* get - retrieve information,",
    "* set - set parameters,",
    "* help - print this message.",
    "Parameters:",
    "* temp:",
    "  * [get MODE] Get chamber temperature. Unit is degrees Celsius.",
    "  * [set MODE] Set target temperature. Allowed values 45-65. Unit is degrees Celsius.",
    "* time:",
    "  * [get MODE] Get estimated time till finish as HH:MM.",
    "  * [set MODE] Set job duration. Allowed values 0-24. Unit is hours.",
    "* status:",
    "  * [get MODE] Check if the job is running. Returns either \"running\" or \"stopped\".",
    "  * [set MODE] \"start\" starts the job, \"stop\" stops the job.",
    "Flow:",
    "1. Set up temperature and time.",
    "2. Set status to \"start\" to start the job.",
    "Notes:",
    "Once the job is running, the settings are applied live.",
    "Setting time while running restarts the countdown.",
    "Stopping the job does not reset the set up values.",
    "Responses:",
    "* Responses follow <status> or <status>:<value> format.",
    "* Status is either \"OK\" on success or \"ERR\" on failure.",
    "* If a command returns a value, it is printed after \":\".",
];

/// Help text source that shows the banner only once per boot
#[derive(Debug, Clone)]
pub struct HelpText {
    banner_pending: bool,
}

impl Default for HelpText {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpText {
    /// Create a help source that still owes the boot banner
    pub const fn new() -> Self {
        Self {
            banner_pending: true,
        }
    }

    /// Lines to print for one `help` command
    pub fn lines(&mut self) -> impl Iterator<Item = &'static str> {
        let with_banner = core::mem::replace(&mut self.banner_pending, false);
        let banner: &'static [&'static str] = if with_banner { BANNER } else { &[] };
        banner.iter().chain(TEXT.iter()).copied()
    }
}
