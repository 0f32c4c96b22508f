//! Immediate-operand dispatch for x86 shuffles
//!
//! Shuffle intrinsics take their control byte as a const generic. Selectors
//! arrive here as runtime values that fold to constants once the calling
//! vector operation is inlined, so a full match over the byte lets the
//! optimizer keep exactly one arm.

/// Expands `$body` with `$imm` bound to the value of `$value` as a constant.
macro_rules! constify_imm8 {
    ($value:expr, |$imm:ident| $body:expr) => {
        match ($value) & 0xff {
            0 => { const $imm: i32 = 0; $body }
            1 => { const $imm: i32 = 1; $body }
            2 => { const $imm: i32 = 2; $body }
            3 => { const $imm: i32 = 3; $body }
            4 => { const $imm: i32 = 4; $body }
            5 => { const $imm: i32 = 5; $body }
            6 => { const $imm: i32 = 6; $body }
            7 => { const $imm: i32 = 7; $body }
            8 => { const $imm: i32 = 8; $body }
            9 => { const $imm: i32 = 9; $body }
            10 => { const $imm: i32 = 10; $body }
            11 => { const $imm: i32 = 11; $body }
            12 => { const $imm: i32 = 12; $body }
            13 => { const $imm: i32 = 13; $body }
            14 => { const $imm: i32 = 14; $body }
            15 => { const $imm: i32 = 15; $body }
            16 => { const $imm: i32 = 16; $body }
            17 => { const $imm: i32 = 17; $body }
            18 => { const $imm: i32 = 18; $body }
            19 => { const $imm: i32 = 19; $body }
            20 => { const $imm: i32 = 20; $body }
            21 => { const $imm: i32 = 21; $body }
            22 => { const $imm: i32 = 22; $body }
            23 => { const $imm: i32 = 23; $body }
            24 => { const $imm: i32 = 24; $body }
            25 => { const $imm: i32 = 25; $body }
            26 => { const $imm: i32 = 26; $body }
            27 => { const $imm: i32 = 27; $body }
            28 => { const $imm: i32 = 28; $body }
            29 => { const $imm: i32 = 29; $body }
            30 => { const $imm: i32 = 30; $body }
            31 => { const $imm: i32 = 31; $body }
            32 => { const $imm: i32 = 32; $body }
            33 => { const $imm: i32 = 33; $body }
            34 => { const $imm: i32 = 34; $body }
            35 => { const $imm: i32 = 35; $body }
            36 => { const $imm: i32 = 36; $body }
            37 => { const $imm: i32 = 37; $body }
            38 => { const $imm: i32 = 38; $body }
            39 => { const $imm: i32 = 39; $body }
            40 => { const $imm: i32 = 40; $body }
            41 => { const $imm: i32 = 41; $body }
            42 => { const $imm: i32 = 42; $body }
            43 => { const $imm: i32 = 43; $body }
            44 => { const $imm: i32 = 44; $body }
            45 => { const $imm: i32 = 45; $body }
            46 => { const $imm: i32 = 46; $body }
            47 => { const $imm: i32 = 47; $body }
            48 => { const $imm: i32 = 48; $body }
            49 => { const $imm: i32 = 49; $body }
            50 => { const $imm: i32 = 50; $body }
            51 => { const $imm: i32 = 51; $body }
            52 => { const $imm: i32 = 52; $body }
            53 => { const $imm: i32 = 53; $body }
            54 => { const $imm: i32 = 54; $body }
            55 => { const $imm: i32 = 55; $body }
            56 => { const $imm: i32 = 56; $body }
            57 => { const $imm: i32 = 57; $body }
            58 => { const $imm: i32 = 58; $body }
            59 => { const $imm: i32 = 59; $body }
            60 => { const $imm: i32 = 60; $body }
            61 => { const $imm: i32 = 61; $body }
            62 => { const $imm: i32 = 62; $body }
            63 => { const $imm: i32 = 63; $body }
            64 => { const $imm: i32 = 64; $body }
            65 => { const $imm: i32 = 65; $body }
            66 => { const $imm: i32 = 66; $body }
            67 => { const $imm: i32 = 67; $body }
            68 => { const $imm: i32 = 68; $body }
            69 => { const $imm: i32 = 69; $body }
            70 => { const $imm: i32 = 70; $body }
            71 => { const $imm: i32 = 71; $body }
            72 => { const $imm: i32 = 72; $body }
            73 => { const $imm: i32 = 73; $body }
            74 => { const $imm: i32 = 74; $body }
            75 => { const $imm: i32 = 75; $body }
            76 => { const $imm: i32 = 76; $body }
            77 => { const $imm: i32 = 77; $body }
            78 => { const $imm: i32 = 78; $body }
            79 => { const $imm: i32 = 79; $body }
            80 => { const $imm: i32 = 80; $body }
            81 => { const $imm: i32 = 81; $body }
            82 => { const $imm: i32 = 82; $body }
            83 => { const $imm: i32 = 83; $body }
            84 => { const $imm: i32 = 84; $body }
            85 => { const $imm: i32 = 85; $body }
            86 => { const $imm: i32 = 86; $body }
            87 => { const $imm: i32 = 87; $body }
            88 => { const $imm: i32 = 88; $body }
            89 => { const $imm: i32 = 89; $body }
            90 => { const $imm: i32 = 90; $body }
            91 => { const $imm: i32 = 91; $body }
            92 => { const $imm: i32 = 92; $body }
            93 => { const $imm: i32 = 93; $body }
            94 => { const $imm: i32 = 94; $body }
            95 => { const $imm: i32 = 95; $body }
            96 => { const $imm: i32 = 96; $body }
            97 => { const $imm: i32 = 97; $body }
            98 => { const $imm: i32 = 98; $body }
            99 => { const $imm: i32 = 99; $body }
            100 => { const $imm: i32 = 100; $body }
            101 => { const $imm: i32 = 101; $body }
            102 => { const $imm: i32 = 102; $body }
            103 => { const $imm: i32 = 103; $body }
            104 => { const $imm: i32 = 104; $body }
            105 => { const $imm: i32 = 105; $body }
            106 => { const $imm: i32 = 106; $body }
            107 => { const $imm: i32 = 107; $body }
            108 => { const $imm: i32 = 108; $body }
            109 => { const $imm: i32 = 109; $body }
            110 => { const $imm: i32 = 110; $body }
            111 => { const $imm: i32 = 111; $body }
            112 => { const $imm: i32 = 112; $body }
            113 => { const $imm: i32 = 113; $body }
            114 => { const $imm: i32 = 114; $body }
            115 => { const $imm: i32 = 115; $body }
            116 => { const $imm: i32 = 116; $body }
            117 => { const $imm: i32 = 117; $body }
            118 => { const $imm: i32 = 118; $body }
            119 => { const $imm: i32 = 119; $body }
            120 => { const $imm: i32 = 120; $body }
            121 => { const $imm: i32 = 121; $body }
            122 => { const $imm: i32 = 122; $body }
            123 => { const $imm: i32 = 123; $body }
            124 => { const $imm: i32 = 124; $body }
            125 => { const $imm: i32 = 125; $body }
            126 => { const $imm: i32 = 126; $body }
            127 => { const $imm: i32 = 127; $body }
            128 => { const $imm: i32 = 128; $body }
            129 => { const $imm: i32 = 129; $body }
            130 => { const $imm: i32 = 130; $body }
            131 => { const $imm: i32 = 131; $body }
            132 => { const $imm: i32 = 132; $body }
            133 => { const $imm: i32 = 133; $body }
            134 => { const $imm: i32 = 134; $body }
            135 => { const $imm: i32 = 135; $body }
            136 => { const $imm: i32 = 136; $body }
            137 => { const $imm: i32 = 137; $body }
            138 => { const $imm: i32 = 138; $body }
            139 => { const $imm: i32 = 139; $body }
            140 => { const $imm: i32 = 140; $body }
            141 => { const $imm: i32 = 141; $body }
            142 => { const $imm: i32 = 142; $body }
            143 => { const $imm: i32 = 143; $body }
            144 => { const $imm: i32 = 144; $body }
            145 => { const $imm: i32 = 145; $body }
            146 => { const $imm: i32 = 146; $body }
            147 => { const $imm: i32 = 147; $body }
            148 => { const $imm: i32 = 148; $body }
            149 => { const $imm: i32 = 149; $body }
            150 => { const $imm: i32 = 150; $body }
            151 => { const $imm: i32 = 151; $body }
            152 => { const $imm: i32 = 152; $body }
            153 => { const $imm: i32 = 153; $body }
            154 => { const $imm: i32 = 154; $body }
            155 => { const $imm: i32 = 155; $body }
            156 => { const $imm: i32 = 156; $body }
            157 => { const $imm: i32 = 157; $body }
            158 => { const $imm: i32 = 158; $body }
            159 => { const $imm: i32 = 159; $body }
            160 => { const $imm: i32 = 160; $body }
            161 => { const $imm: i32 = 161; $body }
            162 => { const $imm: i32 = 162; $body }
            163 => { const $imm: i32 = 163; $body }
            164 => { const $imm: i32 = 164; $body }
            165 => { const $imm: i32 = 165; $body }
            166 => { const $imm: i32 = 166; $body }
            167 => { const $imm: i32 = 167; $body }
            168 => { const $imm: i32 = 168; $body }
            169 => { const $imm: i32 = 169; $body }
            170 => { const $imm: i32 = 170; $body }
            171 => { const $imm: i32 = 171; $body }
            172 => { const $imm: i32 = 172; $body }
            173 => { const $imm: i32 = 173; $body }
            174 => { const $imm: i32 = 174; $body }
            175 => { const $imm: i32 = 175; $body }
            176 => { const $imm: i32 = 176; $body }
            177 => { const $imm: i32 = 177; $body }
            178 => { const $imm: i32 = 178; $body }
            179 => { const $imm: i32 = 179; $body }
            180 => { const $imm: i32 = 180; $body }
            181 => { const $imm: i32 = 181; $body }
            182 => { const $imm: i32 = 182; $body }
            183 => { const $imm: i32 = 183; $body }
            184 => { const $imm: i32 = 184; $body }
            185 => { const $imm: i32 = 185; $body }
            186 => { const $imm: i32 = 186; $body }
            187 => { const $imm: i32 = 187; $body }
            188 => { const $imm: i32 = 188; $body }
            189 => { const $imm: i32 = 189; $body }
            190 => { const $imm: i32 = 190; $body }
            191 => { const $imm: i32 = 191; $body }
            192 => { const $imm: i32 = 192; $body }
            193 => { const $imm: i32 = 193; $body }
            194 => { const $imm: i32 = 194; $body }
            195 => { const $imm: i32 = 195; $body }
            196 => { const $imm: i32 = 196; $body }
            197 => { const $imm: i32 = 197; $body }
            198 => { const $imm: i32 = 198; $body }
            199 => { const $imm: i32 = 199; $body }
            200 => { const $imm: i32 = 200; $body }
            201 => { const $imm: i32 = 201; $body }
            202 => { const $imm: i32 = 202; $body }
            203 => { const $imm: i32 = 203; $body }
            204 => { const $imm: i32 = 204; $body }
            205 => { const $imm: i32 = 205; $body }
            206 => { const $imm: i32 = 206; $body }
            207 => { const $imm: i32 = 207; $body }
            208 => { const $imm: i32 = 208; $body }
            209 => { const $imm: i32 = 209; $body }
            210 => { const $imm: i32 = 210; $body }
            211 => { const $imm: i32 = 211; $body }
            212 => { const $imm: i32 = 212; $body }
            213 => { const $imm: i32 = 213; $body }
            214 => { const $imm: i32 = 214; $body }
            215 => { const $imm: i32 = 215; $body }
            216 => { const $imm: i32 = 216; $body }
            217 => { const $imm: i32 = 217; $body }
            218 => { const $imm: i32 = 218; $body }
            219 => { const $imm: i32 = 219; $body }
            220 => { const $imm: i32 = 220; $body }
            221 => { const $imm: i32 = 221; $body }
            222 => { const $imm: i32 = 222; $body }
            223 => { const $imm: i32 = 223; $body }
            224 => { const $imm: i32 = 224; $body }
            225 => { const $imm: i32 = 225; $body }
            226 => { const $imm: i32 = 226; $body }
            227 => { const $imm: i32 = 227; $body }
            228 => { const $imm: i32 = 228; $body }
            229 => { const $imm: i32 = 229; $body }
            230 => { const $imm: i32 = 230; $body }
            231 => { const $imm: i32 = 231; $body }
            232 => { const $imm: i32 = 232; $body }
            233 => { const $imm: i32 = 233; $body }
            234 => { const $imm: i32 = 234; $body }
            235 => { const $imm: i32 = 235; $body }
            236 => { const $imm: i32 = 236; $body }
            237 => { const $imm: i32 = 237; $body }
            238 => { const $imm: i32 = 238; $body }
            239 => { const $imm: i32 = 239; $body }
            240 => { const $imm: i32 = 240; $body }
            241 => { const $imm: i32 = 241; $body }
            242 => { const $imm: i32 = 242; $body }
            243 => { const $imm: i32 = 243; $body }
            244 => { const $imm: i32 = 244; $body }
            245 => { const $imm: i32 = 245; $body }
            246 => { const $imm: i32 = 246; $body }
            247 => { const $imm: i32 = 247; $body }
            248 => { const $imm: i32 = 248; $body }
            249 => { const $imm: i32 = 249; $body }
            250 => { const $imm: i32 = 250; $body }
            251 => { const $imm: i32 = 251; $body }
            252 => { const $imm: i32 = 252; $body }
            253 => { const $imm: i32 = 253; $body }
            254 => { const $imm: i32 = 254; $body }
            255 => { const $imm: i32 = 255; $body }
            _ => unreachable!(),
        }
    };
}
