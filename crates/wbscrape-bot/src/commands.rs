//! Chat command parsing.

pub const HELP_TEXT: &str = "Привет! Я бот для парсинга данных с Wildberries.\n\
Отправь мне ссылку на продавца или бренд, и я соберу данные для тебя.\n\
Пример ссылки на продавца: https://www.wildberries.ru/seller/8969\n\
Пример ссылки на бренд: https://www.wildberries.ru/brands/eksmo/\n\
Используй команду /parse <ссылка>, чтобы начать парсинг.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    /// `/parse <link>`; `link` is `None` when the argument is missing.
    Parse { link: Option<String> },
}

impl Command {
    /// Parses a message text. Returns `None` for plain text and unknown
    /// commands, which the bot ignores.
    ///
    /// Accepts the `/command@botname` form used in group chats.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        let head = words.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or(head);

        match name {
            "start" => Some(Command::Start),
            "parse" => Some(Command::Parse {
                link: words.next().map(str::to_owned),
            }),
            _ => None,
        }
    }
}
