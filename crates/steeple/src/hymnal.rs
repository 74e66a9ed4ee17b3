//! Built-in hymn table for the program edit form's pickers.
//!
//! Deliberately a subset of the hymnal, covering the frequently chosen
//! entries; the form's number and title fields stay free text, so anything
//! outside this table can still be entered by hand. Numbers and titles are
//! paired so the form can offer both in one datalist.

pub const HYMNS: &[(&str, &str)] = &[
    ("2", "The Spirit of God"),
    ("19", "We Thank Thee, O God, for a Prophet"),
    ("26", "Joseph Smith's First Prayer"),
    ("27", "Praise to the Man"),
    ("30", "Come, Come, Ye Saints"),
    ("66", "Rejoice, the Lord Is King!"),
    ("85", "How Firm a Foundation"),
    ("86", "How Great Thou Art"),
    ("92", "For the Beauty of the Earth"),
    ("98", "I Need Thee Every Hour"),
    ("100", "Nearer, Dear Savior, to Thee"),
    ("113", "Our Savior's Love"),
    ("116", "Come, Follow Me"),
    ("136", "I Know That My Redeemer Lives"),
    ("152", "God Be with You Till We Meet Again"),
    ("166", "Abide with Me!"),
    ("169", "As Now We Take the Sacrament"),
    ("172", "In Humility, Our Savior"),
    ("174", "While of These Emblems We Partake"),
    ("193", "I Stand All Amazed"),
    ("219", "Because I Have Been Given Much"),
    ("301", "I Am a Child of God"),
    ("304", "Teach Me to Walk in the Light"),
];
