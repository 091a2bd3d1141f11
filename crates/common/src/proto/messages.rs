//! Command grammar and response lines.
//!
//! One request per newline-terminated line, verb and arguments split on
//! whitespace. One response line per request: success lines start with
//! `OK`, failure lines with `ERROR`.

/// A parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Login { username: String, password: String },
    Signup { username: String, password: String },
    Mkdir { name: String },
    Cd { name: String },
    Rmdir { name: String },
    Logout,
    Pwd,
    Ls,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("wrong argument count for {0}")]
    Malformed(&'static str),
}

impl Request {
    /// Parse one line. Blank lines parse to `None` and get no response.
    pub fn parse(line: &str) -> Result<Option<Request>, ParseError> {
        let mut words = line.split_whitespace();
        let verb = match words.next() {
            Some(verb) => verb,
            None => return Ok(None),
        };
        let args: Vec<&str> = words.collect();

        let request = match verb {
            "login" => match args.as_slice() {
                [username, password] => Request::Login {
                    username: (*username).to_owned(),
                    password: (*password).to_owned(),
                },
                _ => return Err(ParseError::Malformed("login")),
            },
            "signup" => match args.as_slice() {
                [username, password] => Request::Signup {
                    username: (*username).to_owned(),
                    password: (*password).to_owned(),
                },
                _ => return Err(ParseError::Malformed("signup")),
            },
            "mkdir" => match args.as_slice() {
                [name] => Request::Mkdir {
                    name: (*name).to_owned(),
                },
                _ => return Err(ParseError::Malformed("mkdir")),
            },
            "cd" => match args.as_slice() {
                [name] => Request::Cd {
                    name: (*name).to_owned(),
                },
                _ => return Err(ParseError::Malformed("cd")),
            },
            "rmdir" => match args.as_slice() {
                [name] => Request::Rmdir {
                    name: (*name).to_owned(),
                },
                _ => return Err(ParseError::Malformed("rmdir")),
            },
            "logout" => match args.as_slice() {
                [] => Request::Logout,
                _ => return Err(ParseError::Malformed("logout")),
            },
            "pwd" => match args.as_slice() {
                [] => Request::Pwd,
                _ => return Err(ParseError::Malformed("pwd")),
            },
            "ls" => match args.as_slice() {
                [] => Request::Ls,
                _ => return Err(ParseError::Malformed("ls")),
            },
            other => return Err(ParseError::UnknownCommand(other.to_owned())),
        };

        Ok(Some(request))
    }
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok,
    /// `OK <absolute path>`, the `pwd` success shape.
    Path(String),
    /// `OK [<name> ...]`, the `ls` success shape.
    Entries(Vec<String>),
    InvalidCredentials,
    UsernameTaken,
    Exists,
    NotFound,
    NotEmpty,
    InUse,
    NotAuthenticated,
    InvalidName,
    UnknownCommand,
    MalformedCommand,
    Internal,
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Path(path) => write!(f, "OK {}", path),
            Reply::Entries(entries) => {
                if entries.is_empty() {
                    write!(f, "OK")
                } else {
                    write!(f, "OK {}", entries.join(" "))
                }
            }
            Reply::InvalidCredentials => write!(f, "ERROR invalid credentials"),
            Reply::UsernameTaken => write!(f, "ERROR username taken"),
            Reply::Exists => write!(f, "ERROR exists"),
            Reply::NotFound => write!(f, "ERROR not found"),
            Reply::NotEmpty => write!(f, "ERROR not empty"),
            Reply::InUse => write!(f, "ERROR in use"),
            Reply::NotAuthenticated => write!(f, "ERROR not authenticated"),
            Reply::InvalidName => write!(f, "ERROR invalid name"),
            Reply::UnknownCommand => write!(f, "ERROR unknown command"),
            Reply::MalformedCommand => write!(f, "ERROR malformed command"),
            Reply::Internal => write!(f, "ERROR internal"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_login_signup() {
        assert_eq!(
            Request::parse("login alice secret").unwrap(),
            Some(Request::Login {
                username: "alice".into(),
                password: "secret".into()
            })
        );
        assert_eq!(
            Request::parse("signup bob hunter2").unwrap(),
            Some(Request::Signup {
                username: "bob".into(),
                password: "hunter2".into()
            })
        );
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        // Trailing spaces before the newline are routine in scripted input.
        assert_eq!(
            Request::parse("cd hi ").unwrap(),
            Some(Request::Cd { name: "hi".into() })
        );
        assert_eq!(
            Request::parse("  mkdir   docs").unwrap(),
            Some(Request::Mkdir {
                name: "docs".into()
            })
        );
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(Request::parse("").unwrap(), None);
        assert_eq!(Request::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_wrong_arity() {
        assert_eq!(
            Request::parse("login alice"),
            Err(ParseError::Malformed("login"))
        );
        assert_eq!(
            Request::parse("mkdir a b"),
            Err(ParseError::Malformed("mkdir"))
        );
        assert_eq!(
            Request::parse("logout now"),
            Err(ParseError::Malformed("logout"))
        );
    }

    #[test]
    fn test_parse_unknown_verb() {
        assert_eq!(
            Request::parse("foobar baz"),
            Err(ParseError::UnknownCommand("foobar".into()))
        );
    }

    #[test]
    fn test_reply_rendering() {
        assert_eq!(Reply::Ok.to_string(), "OK");
        assert_eq!(Reply::Path("/a/b".into()).to_string(), "OK /a/b");
        assert_eq!(Reply::Entries(vec![]).to_string(), "OK");
        assert_eq!(
            Reply::Entries(vec!["a".into(), "b".into()]).to_string(),
            "OK a b"
        );
        assert_eq!(
            Reply::InvalidCredentials.to_string(),
            "ERROR invalid credentials"
        );
        assert_eq!(Reply::UsernameTaken.to_string(), "ERROR username taken");
        assert_eq!(Reply::Exists.to_string(), "ERROR exists");
        assert_eq!(Reply::NotFound.to_string(), "ERROR not found");
        assert_eq!(Reply::UnknownCommand.to_string(), "ERROR unknown command");
    }
}
