//! `Comment` — a threaded, timestamped annotation (spec §6, `CMT_ID`).

use super::SectionPayload;
use crate::buffer::{ByteReader, ByteWriter};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comment {
    pub id: u32,
    /// 0 if this comment starts a thread.
    pub prev_reply_id: u32,
    /// 0 if this comment has no reply yet.
    pub next_reply_id: u32,
    /// Seconds since 1970-01-01 UTC.
    pub time: u32,
    pub author: String,
    pub title: String,
    pub comment: String,
}

impl SectionPayload for Comment {
    fn decode(reader: &mut ByteReader) -> Result<Self> {
        Ok(Comment {
            id: reader.read_u32()?,
            prev_reply_id: reader.read_u32()?,
            next_reply_id: reader.read_u32()?,
            time: reader.read_time()?,
            author: reader.read_str()?,
            title: reader.read_str()?,
            comment: reader.read_str()?,
        })
    }

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.id);
        writer.write_u32(self.prev_reply_id);
        writer.write_u32(self.next_reply_id);
        writer.write_time(self.time);
        writer.write_str(&self.author);
        writer.write_str(&self.title);
        writer.write_str(&self.comment);
    }

    fn size(&self) -> u32 {
        4 * 4
            + 2
            + self.author.len() as u32
            + 2
            + self.title.len() as u32
            + 2
            + self.comment.len() as u32
    }

    fn describe(&self) -> String {
        format!("[{}] {}: {}", self.time, self.author, self.title)
    }
}
