//! Telegram-facing glue: command and callback handlers over the
//! [`Allocator`](crate::state::Allocator).

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, User};
use teloxide::utils::command::BotCommands;

use crate::consts::{replies, NEXT_CALLBACK, NEXT_LABEL};
use crate::state::{Allocator, UndoCheck};
use crate::utils;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Komutlar:")]
pub enum Command {
    #[command(description = "sıradaki numara aralığını al")]
    Al,
    #[command(description = "başlangıç numarasını ayarla")]
    Edit(String),
    #[command(description = "botun son mesajını alıntılayıp numaraları geri al")]
    Sil,
}

pub async fn on_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    alloc: Arc<Allocator>,
) -> ResponseResult<()> {
    match cmd {
        Command::Al => {
            let Some(user) = msg.from() else { return Ok(()) };
            allocate(&bot, msg.chat.id, user, &alloc).await
        }
        Command::Edit(arg) => edit(&bot, &msg, arg.trim(), &alloc).await,
        Command::Sil => undo(&bot, &msg, &alloc).await,
    }
}

/// A press on the inline button is the same allocation, on behalf of
/// whoever pressed it.
pub async fn on_callback(bot: Bot, q: CallbackQuery, alloc: Arc<Allocator>) -> ResponseResult<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    if q.data.as_deref() != Some(NEXT_CALLBACK) {
        return Ok(());
    }
    // Telegram stops attaching the originating message after a while;
    // without it there is no chat to announce into.
    let Some(origin) = q.message.as_ref() else { return Ok(()) };

    allocate(&bot, origin.chat.id, &q.from, &alloc).await
}

/// Reserve, announce, commit. The counter is advanced before the send so
/// a concurrent request can never see the same range; a failed send rolls
/// it back.
async fn allocate(bot: &Bot, chat: ChatId, user: &User, alloc: &Allocator) -> ResponseResult<()> {
    let (from, to) = alloc.reserve();
    let text = utils::format_announcement(&user.full_name(), &utils::today_istanbul(), from);
    let keyboard =
        InlineKeyboardMarkup::new([[InlineKeyboardButton::callback(NEXT_LABEL, NEXT_CALLBACK)]]);

    match bot.send_message(chat, text).reply_markup(keyboard).await {
        Ok(sent) => {
            alloc.commit(sent.id.0, from, to);
            log::info!("issued {:05}-{:05} to {}", from, to, user.full_name());
            Ok(())
        }
        Err(e) => {
            log::error!("send failed, rolling counter back to {from}: {e}");
            alloc.rollback(from);
            bot.send_message(chat, replies::send_failed(&e)).await?;
            Ok(())
        }
    }
}

async fn edit(bot: &Bot, msg: &Message, arg: &str, alloc: &Allocator) -> ResponseResult<()> {
    match arg.parse::<i64>().ok().filter(|n| *n >= 0) {
        Some(n) => {
            alloc.reset(n);
            log::info!("counter reset to {n:05}");
            bot.send_message(msg.chat.id, replies::edit_done(n)).await?;
        }
        None => {
            bot.send_message(msg.chat.id, replies::EDIT_USAGE).await?;
        }
    }
    Ok(())
}

/// Undo is strictly last-in-first-out and gated on the delete call
/// actually succeeding.
async fn undo(bot: &Bot, msg: &Message, alloc: &Allocator) -> ResponseResult<()> {
    let Some(target) = msg.reply_to_message() else {
        bot.send_message(msg.chat.id, replies::SIL_USAGE).await?;
        return Ok(());
    };

    match alloc.check_undo(target.id.0) {
        UndoCheck::Empty => {
            bot.send_message(msg.chat.id, replies::SIL_EMPTY).await?;
        }
        UndoCheck::NotLast => {
            bot.send_message(msg.chat.id, replies::SIL_NOT_LAST).await?;
        }
        UndoCheck::Eligible => match bot.delete_message(msg.chat.id, target.id).await {
            Ok(_) => {
                let reply = if alloc.commit_undo(target.id.0) {
                    log::info!("undid allocation announced by message {}", target.id.0);
                    replies::SIL_DONE
                } else {
                    // An allocation landed while the delete was in flight.
                    replies::SIL_NOT_LAST
                };
                bot.send_message(msg.chat.id, reply).await?;
            }
            Err(e) => {
                log::error!("delete of message {} failed: {e}", target.id.0);
                bot.send_message(msg.chat.id, replies::delete_failed(&e)).await?;
            }
        },
    }
    Ok(())
}
